use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::SharedState;

/// Health-check response with a ledger snapshot.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Number of watermark records currently registered.
    pub registered_watermarks: usize,
    /// Number of candidate/reference pairs awaiting evaluation.
    pub pending_requests: usize,
}

/// `GET /health`
///
/// Returns liveness plus the current ledger and queue sizes, which makes
/// the endpoint double as a cheap smoke test for the backing file.
pub async fn health(State(state): State<SharedState>) -> (StatusCode, Json<HealthResponse>) {
    let registered_watermarks = state.registry.lock().await.len();
    let pending_requests = state.pending.lock().await.pending().len();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            registered_watermarks,
            pending_requests,
        }),
    )
}
