use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use honeyguard_bus::BusPublisher;
use honeyguard_client::ApiClient;
use honeyguard_schema::BusMessage;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::PollingConfig;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Background side of the dashboard: the stats and intel refresh loops plus
/// report requests. Results go out on the bus; nothing is published once
/// [`Dashboard::shutdown`] has returned.
pub struct Dashboard {
    client: ApiClient,
    publisher: BusPublisher,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl Dashboard {
    /// Spawns both refresh loops. The stats loop first fires one period from
    /// now; the intel loop fires immediately.
    pub fn start(client: ApiClient, publisher: BusPublisher, polling: &PollingConfig) -> Self {
        let dashboard = Self {
            client,
            publisher,
            cancel: CancellationToken::new(),
            tasks: TaskTracker::new(),
        };

        let stats_period = polling.stats_interval().max(MIN_PERIOD);
        let client = dashboard.client.clone();
        dashboard.tasks.spawn(poll_loop(
            "stats",
            Instant::now() + stats_period,
            stats_period,
            dashboard.cancel.child_token(),
            dashboard.publisher.clone(),
            move || {
                let client = client.clone();
                async move {
                    BusMessage::StatsRefreshed {
                        stats: client.fetch_dashboard_data().await,
                        at: Utc::now(),
                    }
                }
            },
        ));

        let intel_period = polling.intel_interval().max(MIN_PERIOD);
        let client = dashboard.client.clone();
        dashboard.tasks.spawn(poll_loop(
            "intel",
            Instant::now(),
            intel_period,
            dashboard.cancel.child_token(),
            dashboard.publisher.clone(),
            move || {
                let client = client.clone();
                async move {
                    BusMessage::IntelRefreshed {
                        items: client.fetch_intel().await,
                        at: Utc::now(),
                    }
                }
            },
        ));

        tracing::info!(
            stats_interval_ms = stats_period.as_millis() as u64,
            intel_interval_ms = intel_period.as_millis() as u64,
            "dashboard pollers started"
        );
        dashboard
    }

    /// Runs one report request in the background and publishes
    /// [`BusMessage::ReportCompleted`]. Callers gate repeated triggers through
    /// `DashboardState::begin_report`.
    pub fn request_report(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        let client = self.client.clone();
        let publisher = self.publisher.clone();
        let token = self.cancel.child_token();
        self.tasks.spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = client.report_scam() => result,
            };
            if token.is_cancelled() {
                return;
            }
            tracing::info!(status = %result.status, "report finished");
            let msg = BusMessage::ReportCompleted {
                result,
                at: Utc::now(),
            };
            if let Err(e) = publisher.publish(msg).await {
                tracing::warn!("failed to publish report result: {e}");
            }
        });
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Stops future ticks, aborts in-flight requests and waits for every task
    /// to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        tracing::info!("dashboard pollers stopped");
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop<F, Fut>(
    name: &'static str,
    first_tick: Instant,
    period: Duration,
    token: CancellationToken,
    publisher: BusPublisher,
    mut fetch: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = BusMessage>,
{
    let mut ticker = interval_at(first_tick, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tracing::debug!(poller = name, "poll tick");

        let msg = tokio::select! {
            _ = token.cancelled() => break,
            msg = fetch() => msg,
        };
        if token.is_cancelled() {
            break;
        }
        if let Err(e) = publisher.publish(msg).await {
            tracing::warn!(poller = name, "failed to publish poll result: {e}");
        }
    }

    tracing::debug!(poller = name, "poller exited");
}
