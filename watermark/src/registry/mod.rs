//! Watermark registration ledger.
//!
//! The ledger maps an image's content digest to the ground-truth
//! watermark matrix produced at embed time, plus the path the
//! watermarked image was written to. Verifiers retrieve registered
//! records and score candidate images against each ground truth.

mod json_file;
mod mem;

pub use json_file::JsonFileRegistry;
pub use mem::InMemoryRegistry;

use thiserror::Error;

use crate::error::WatermarkError;
use crate::types::{GroundTruth, ImageDigest};

/// One registered watermark record.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisteredWatermark {
    /// Content digest of the watermarked image, the ledger key.
    pub image_digest: ImageDigest,
    /// Where the watermarked image was stored.
    pub image_path: String,
    /// Ground-truth matrix to score extractions against.
    pub ground_truth: GroundTruth,
}

/// Ledger-level error type.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying filesystem failure.
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The ledger file could not be parsed or written as JSON.
    #[error("registry serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A stored record is structurally invalid (e.g. ragged matrix rows).
    #[error("corrupted registry record: {0}")]
    CorruptedRecord(WatermarkError),
}

/// Storage abstraction for watermark registrations.
pub trait WatermarkRegistry {
    /// Inserts or replaces the record for its image digest.
    fn register(&mut self, record: RegisteredWatermark) -> Result<(), RegistryError>;

    /// Looks up a record by image digest.
    fn get(&self, digest: &ImageDigest) -> Option<RegisteredWatermark>;

    /// Returns every registered record, for exhaustive candidate
    /// matching.
    fn retrieve_all(&self) -> Vec<RegisteredWatermark>;
}
