use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::state::SharedState;

/// One candidate/reference pair, as exchanged with the external
/// semantic-integrity evaluator.
#[derive(Debug, Serialize, Deserialize)]
pub struct PendingRequestDto {
    pub candidate_image_path: String,
    pub reference_image_path: String,
}

/// Result body for `POST /requests/results`.
///
/// `tool_details` is opaque to the gateway: it carries whatever per-tool
/// verdicts and confidences the evaluator aggregated.
#[derive(Debug, Deserialize)]
pub struct SemanticIntegrityResult {
    pub candidate_image_path: String,
    pub reference_image_path: String,
    pub overall_prediction: bool,
    pub tool_details: serde_json::Value,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response body for an accepted evaluation result.
#[derive(Debug, Serialize)]
pub struct ResultAcceptedResponse {
    pub message: String,
    pub overall_prediction: bool,
    pub tool_details: serde_json::Value,
}

/// `GET /requests/pending`
///
/// Lists the candidate/reference pairs still waiting for evaluation.
pub async fn list_pending(State(state): State<SharedState>) -> Json<Vec<PendingRequestDto>> {
    let queue = state.pending.lock().await;
    let pending = queue
        .pending()
        .into_iter()
        .map(|e| PendingRequestDto {
            candidate_image_path: e.candidate_image_path,
            reference_image_path: e.reference_image_path,
        })
        .collect();
    Json(pending)
}

/// `POST /requests/pending`
///
/// Adds a pair to the queue; repeated submissions report the existing
/// state instead of queueing twice.
pub async fn add_pending(
    State(state): State<SharedState>,
    Json(body): Json<PendingRequestDto>,
) -> (StatusCode, Json<MessageResponse>) {
    let candidate = body.candidate_image_path.trim();
    let reference = body.reference_image_path.trim();

    let mut queue = state.pending.lock().await;
    match queue.enqueue(candidate, reference) {
        Some(status) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: format!("This pair already exists with state '{}'.", status.as_str()),
            }),
        ),
        None => {
            tracing::info!(candidate, reference, "queued semantic-integrity request");
            (
                StatusCode::ACCEPTED,
                Json(MessageResponse {
                    message: format!(
                        "Added pair candidate='{candidate}' & reference='{reference}' as pending."
                    ),
                }),
            )
        }
    }
}

/// `POST /requests/results`
///
/// Receives the evaluation verdict for a pending pair and marks it
/// processed; unknown or already-processed pairs are a 404.
pub async fn post_result(
    State(state): State<SharedState>,
    Json(result): Json<SemanticIntegrityResult>,
) -> Result<Json<ResultAcceptedResponse>, (StatusCode, String)> {
    let mut queue = state.pending.lock().await;
    if !queue.mark_processed(&result.candidate_image_path, &result.reference_image_path) {
        return Err((
            StatusCode::NOT_FOUND,
            format!(
                "No pending entry found matching candidate='{}', reference='{}'",
                result.candidate_image_path, result.reference_image_path
            ),
        ));
    }

    tracing::info!(
        candidate = %result.candidate_image_path,
        reference = %result.reference_image_path,
        prediction = result.overall_prediction,
        "semantic-integrity result recorded"
    );

    Ok(Json(ResultAcceptedResponse {
        message: format!(
            "Semantic integrity result received and marked as processed for candidate='{}' and reference='{}'.",
            result.candidate_image_path, result.reference_image_path
        ),
        overall_prediction: result.overall_prediction,
        tool_details: result.tool_details,
    }))
}
