//! Scripted stand-in for the honeypot backend, serving the same endpoints the
//! dashboard polls.

pub mod extract;
pub mod honeypot;
pub mod routes;
pub mod script;
pub mod state;

use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use honeypot::Honeypot;
pub use state::MockState;

pub const DEFAULT_PORT: u16 = 8002;

pub fn create_router(state: MockState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Advances one scripted conversation per `period` until cancelled.
pub async fn run_ticker(state: MockState, period: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let interaction = state.honeypot.write().await.tick();
                tracing::debug!(
                    client_id = interaction.client_id.as_deref().unwrap_or_default(),
                    turns = interaction.turns_count,
                    "scripted turn played"
                );
            }
        }
    }
}

/// Serves on `listener` and runs the ticker (when `tick` is set) until `cancel` fires.
pub async fn serve_on(
    listener: TcpListener,
    state: MockState,
    tick: Option<Duration>,
    cancel: CancellationToken,
) -> Result<()> {
    let ticker = tick.map(|period| {
        tokio::spawn(run_ticker(
            state.clone(),
            period.max(Duration::from_millis(1)),
            cancel.child_token(),
        ))
    });

    tracing::info!("honeyguard mock listening on {}", listener.local_addr()?);
    let shutdown = cancel.clone();
    let served = axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await;

    cancel.cancel();
    if let Some(handle) = ticker {
        if let Err(e) = handle.await {
            tracing::warn!("mock ticker task failed: {e}");
        }
    }
    served?;
    Ok(())
}

pub async fn serve(addr: &str, tick: Option<Duration>, cancel: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, MockState::default(), tick, cancel).await
}
