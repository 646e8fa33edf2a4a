use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use watermark::{
    DIGEST_LEN, GroundTruth, ImageDigest, RegisteredWatermark, WatermarkRegistry,
};

use crate::state::SharedState;

/// Request body for `POST /watermarks/register`.
///
/// This is intentionally minimal: the client passes
/// - `image_digest_hex`: hex-encoded SHA-256 digest of the watermarked
///   image bytes,
/// - `image_path`: where the watermarked image was stored,
/// - `watermark_matrix`: the ground-truth matrix as nested integer rows.
#[derive(Debug, Deserialize)]
pub struct RegisterWatermarkRequest {
    /// Hex-encoded content digest of the watermarked image.
    pub image_digest_hex: String,
    /// Storage path of the watermarked image.
    pub image_path: String,
    /// Ground-truth watermark matrix, one row per diagonal index.
    pub watermark_matrix: Vec<Vec<i8>>,
}

/// Response body for `POST /watermarks/register`.
#[derive(Debug, Serialize)]
pub struct RegisterWatermarkResponse {
    pub status: &'static str,
    pub image_digest: String,
}

/// One ledger record as returned by `GET /watermarks`.
#[derive(Debug, Serialize)]
pub struct RegisteredWatermarkDto {
    pub image_digest: String,
    pub image_path: String,
    pub watermark_matrix: Vec<Vec<i8>>,
}

impl From<RegisteredWatermark> for RegisteredWatermarkDto {
    fn from(record: RegisteredWatermark) -> Self {
        RegisteredWatermarkDto {
            image_digest: record.image_digest.to_hex(),
            image_path: record.image_path,
            watermark_matrix: record.ground_truth.to_nested(),
        }
    }
}

/// Parses a 32-byte hex string into an `ImageDigest`.
fn hex_to_digest(hex_str: &str) -> Result<ImageDigest, &'static str> {
    let bytes = hex::decode(hex_str).map_err(|_| "invalid hex encoding")?;
    if bytes.len() != DIGEST_LEN {
        return Err("expected 32-byte digest");
    }
    let mut arr = [0u8; DIGEST_LEN];
    arr.copy_from_slice(&bytes);
    Ok(ImageDigest(arr))
}

/// `POST /watermarks/register`
///
/// Writes a ground-truth watermark record into the registration ledger.
pub async fn register_watermark(
    State(state): State<SharedState>,
    Json(body): Json<RegisterWatermarkRequest>,
) -> Result<(StatusCode, Json<RegisterWatermarkResponse>), (StatusCode, String)> {
    let digest = hex_to_digest(&body.image_digest_hex).map_err(as_bad_request)?;

    let ground_truth = GroundTruth::from_nested(body.watermark_matrix)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid watermark matrix: {e}")))?;

    let record = RegisteredWatermark {
        image_digest: digest,
        image_path: body.image_path,
        ground_truth,
    };

    {
        let mut registry = state.registry.lock().await;
        registry.register(record).map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to persist registration: {e}"),
            )
        })?;
    }

    tracing::info!(digest = %body.image_digest_hex, "registered watermark");

    Ok((
        StatusCode::CREATED,
        Json(RegisterWatermarkResponse {
            status: "registered",
            image_digest: body.image_digest_hex,
        }),
    ))
}

/// `GET /watermarks`
///
/// Returns every registered watermark record, for exhaustive candidate
/// matching by verifiers.
pub async fn list_watermarks(
    State(state): State<SharedState>,
) -> Json<Vec<RegisteredWatermarkDto>> {
    let registry = state.registry.lock().await;
    let records = registry
        .retrieve_all()
        .into_iter()
        .map(RegisteredWatermarkDto::from)
        .collect();
    Json(records)
}

fn as_bad_request(msg: &'static str) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.to_string())
}
