//! Error types for the watermarking core.

use thiserror::Error;

/// Errors surfaced by the watermark embedding/extraction pipeline.
///
/// All variants are terminal for the operation that produced them: the
/// core never retries and never logs-and-continues. A failed signature
/// verification is a reported `false`, not an error, and therefore has
/// no variant here.
#[derive(Debug, Error)]
pub enum WatermarkError {
    /// Input outside the pipeline's domain: channel dimensions too small
    /// for two wavelet levels, an embedding strength outside `(0, 1]`, a
    /// zero-range channel that cannot be normalized, and similar.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Key material could not be parsed, or is not usable in the role it
    /// was passed for.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The requested watermark length exceeds the number of bits in the
    /// RSA signature it is derived from.
    #[error("watermark of {requested} bits exceeds the {available} available signature bits")]
    WatermarkTooLong { requested: usize, available: usize },

    /// The requested watermark length does not fit into the interleaved
    /// diagonal arrays of the transformed image.
    #[error("watermark of {requested} bits exceeds the embedding capacity of {capacity}")]
    InsufficientCapacity { requested: usize, capacity: usize },

    /// Two sequences or tensors that must agree in length disagree, e.g.
    /// watermark bits vs. position vector.
    #[error("length mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The transform cascade produced a non-finite value (NaN or
    /// infinity) that would otherwise silently corrupt the output.
    #[error("transform failure: {0}")]
    TransformFailure(String),
}
