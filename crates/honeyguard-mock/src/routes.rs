use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use honeyguard_schema::{IntelItem, MessageBody, ReportResult, StatsResponse};
use serde::Deserialize;

use crate::state::MockState;

#[derive(Debug, Deserialize)]
pub struct IngestBody {
    pub message: MessageBody,
    pub client_id: String,
}

pub fn router() -> Router<MockState> {
    Router::new()
        .route("/", get(root))
        .route("/stats", get(stats))
        .route("/api/intel", get(intel))
        .route("/api/report", post(report))
        .route("/guvi-honeypot", post(ingest))
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "honeypot mock online" }))
}

pub async fn stats(State(state): State<MockState>) -> Json<StatsResponse> {
    Json(state.honeypot.read().await.stats())
}

pub async fn intel(State(state): State<MockState>) -> Json<Vec<IntelItem>> {
    Json(state.honeypot.read().await.intel())
}

pub async fn report(State(state): State<MockState>) -> Json<ReportResult> {
    Json(state.honeypot.read().await.report())
}

pub async fn ingest(
    State(state): State<MockState>,
    Json(body): Json<IngestBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if body.client_id.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let interaction = state
        .honeypot
        .write()
        .await
        .ingest(&body.client_id, body.message);
    Ok(Json(crate::honeypot::Honeypot::ingest_response(
        &interaction,
    )))
}
