//! Watermark embedding/extraction strategies.
//!
//! A strategy owns the full per-image pipeline: transforming channels
//! into the embedding domain, modulating symbols in, inverting the
//! transform, and later recovering symbols and scoring them against a
//! registered ground truth.

mod dwt_dct;

pub use dwt_dct::{Dwt2DctMethod, embedding_capacity};

use ndarray::Array2;

use crate::error::WatermarkError;
use crate::types::{GroundTruth, Image, Positions, WatermarkBits};

/// A watermarking method: embed, extract, and score.
///
/// Implementations must be deterministic given their inputs and must not
/// touch any shared mutable state, so callers are free to run embed and
/// extract operations for different images in parallel.
pub trait WatermarkMethod {
    /// Embeds `watermark` into `image` at `positions` with strength
    /// `alpha`, returning the watermarked image and the ground-truth
    /// matrix to register.
    fn embed(
        &self,
        image: &Image,
        watermark: &WatermarkBits,
        positions: &Positions,
        alpha: f64,
    ) -> Result<(Image, GroundTruth), WatermarkError>;

    /// Recovers the watermark symbols at `positions`, averaged across
    /// channels.
    ///
    /// This is the diagnostic path: the returned reals are per-symbol
    /// channel averages of `+1`/`-1` decisions. Verification against a
    /// registered ground truth goes through
    /// [`extract_watermark_matrix`](Self::extract_watermark_matrix)
    /// instead, which needs no position knowledge.
    fn extract(&self, image: &Image, positions: &Positions) -> Result<Vec<f64>, WatermarkError>;

    /// Recovers the full signed matrix over the entire diagonal arrays,
    /// shaped like the ground truth produced at embed time.
    fn extract_watermark_matrix(&self, image: &Image) -> Result<Array2<i8>, WatermarkError>;

    /// Scores an extracted matrix against a registered ground truth:
    /// the percentage of non-zero ground-truth positions the extraction
    /// agrees with, compared strictly against `threshold`.
    ///
    /// Never fails: a shape mismatch or an empty ground truth scores
    /// `(false, 0.0)`.
    fn is_similar(
        &self,
        extracted: &Array2<i8>,
        ground_truth: &GroundTruth,
        threshold: f64,
    ) -> (bool, f64);
}
