//! Dual-diagonal modulation over the DWT -> DWT -> DCT cascade.
//!
//! Embedding writes each symbol symmetrically around the mean of the two
//! interleaved diagonal coefficients at its position: the "even" array
//! gets `mean + alpha * w`, the "odd" array `mean - alpha * w`. The sum
//! of the pair (and with it the average frequency content) is unchanged,
//! while the difference encodes exactly `2 * alpha * w`, so extraction
//! only needs the sign of `even - odd` and survives any distortion that
//! roughly preserves the per-pair DC.

use ndarray::{Array2, Axis};

use crate::error::WatermarkError;
use crate::normalize::{normalize_u8, normalize_unit};
use crate::strategy::WatermarkMethod;
use crate::transform::{FrequencyState, decode_2d, encode_2d};
use crate::types::{GroundTruth, Image, Positions, WatermarkBits};

/// Maximum watermark length embeddable in a `height x width` channel.
///
/// Two wavelet levels leave a `ceil(h/4) x ceil(w/4)` approximation band
/// whose zig-zag sequence splits into diagonals of `floor(n/2)` and
/// `ceil(n/2)` entries; positions start at 2 and must index the shorter
/// one.
pub fn embedding_capacity(height: usize, width: usize) -> usize {
    let rows = height.div_ceil(2).div_ceil(2);
    let cols = width.div_ceil(2).div_ceil(2);
    (rows * cols / 2).saturating_sub(2)
}

/// The DWT²+DCT watermarking method.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dwt2DctMethod;

impl Dwt2DctMethod {
    /// Ensures every position indexes both diagonal arrays.
    fn check_positions(
        positions: &Positions,
        state: &FrequencyState,
    ) -> Result<(), WatermarkError> {
        let bound = state.min_diagonal_len();
        if positions.len() + 2 > bound {
            return Err(WatermarkError::InsufficientCapacity {
                requested: positions.len(),
                capacity: bound.saturating_sub(2),
            });
        }
        if let Some(&max_pos) = positions.as_slice().iter().max() {
            if max_pos >= bound {
                return Err(WatermarkError::InvalidInput(format!(
                    "position {max_pos} is outside the diagonal arrays (length {bound})"
                )));
            }
        }
        Ok(())
    }
}

impl WatermarkMethod for Dwt2DctMethod {
    fn embed(
        &self,
        image: &Image,
        watermark: &WatermarkBits,
        positions: &Positions,
        alpha: f64,
    ) -> Result<(Image, GroundTruth), WatermarkError> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(WatermarkError::InvalidInput(format!(
                "embedding strength {alpha} is outside (0, 1]"
            )));
        }
        if watermark.len() != positions.len() {
            return Err(WatermarkError::ShapeMismatch {
                expected: positions.len(),
                actual: watermark.len(),
            });
        }

        let (height, width, channels) = image.dim();
        if channels == 0 {
            return Err(WatermarkError::InvalidInput(
                "image has no channels".to_string(),
            ));
        }

        let mut watermarked = Image::zeros((height, width, channels));
        let mut ground_truth: Option<Array2<i8>> = None;

        for ch in 0..channels {
            let channel = image.index_axis(Axis(2), ch);
            let unit = normalize_unit(channel)?;
            let mut state = encode_2d(unit.view())?;
            Self::check_positions(positions, &state)?;

            let gt = ground_truth
                .get_or_insert_with(|| Array2::zeros((state.diag_even.len(), channels)));

            for (&symbol, &pos) in watermark.as_slice().iter().zip(positions.as_slice()) {
                let w = f64::from(symbol);
                let mean = 0.5 * (state.diag_even[pos] + state.diag_odd[pos]);
                state.diag_even[pos] = mean + alpha * w;
                state.diag_odd[pos] = mean - alpha * w;
                gt[[pos, ch]] = symbol;
            }

            let restored = decode_2d(&state, (height, width))?;
            let output = normalize_u8(restored.view())?;
            watermarked.index_axis_mut(Axis(2), ch).assign(&output);
        }

        let gt = ground_truth.expect("at least one channel was processed");
        Ok((watermarked, GroundTruth(gt)))
    }

    fn extract(&self, image: &Image, positions: &Positions) -> Result<Vec<f64>, WatermarkError> {
        let (_, _, channels) = image.dim();
        if channels == 0 {
            return Err(WatermarkError::InvalidInput(
                "image has no channels".to_string(),
            ));
        }

        let mut sums = vec![0.0f64; positions.len()];
        for ch in 0..channels {
            let channel = image.index_axis(Axis(2), ch);
            let unit = normalize_unit(channel)?;
            let state = encode_2d(unit.view())?;
            Self::check_positions(positions, &state)?;

            for (sum, &pos) in sums.iter_mut().zip(positions.as_slice()) {
                let diff = state.diag_even[pos] - state.diag_odd[pos];
                *sum += if diff >= 0.0 { 1.0 } else { -1.0 };
            }
        }

        let channels = channels as f64;
        Ok(sums.into_iter().map(|s| s / channels).collect())
    }

    fn extract_watermark_matrix(&self, image: &Image) -> Result<Array2<i8>, WatermarkError> {
        let (_, _, channels) = image.dim();
        if channels == 0 {
            return Err(WatermarkError::InvalidInput(
                "image has no channels".to_string(),
            ));
        }

        let mut matrix: Option<Array2<i8>> = None;
        for ch in 0..channels {
            // The channel is transformed as-is: the sign of `even - odd`
            // is invariant under the affine pixel normalization applied
            // at embed time.
            let channel = image.index_axis(Axis(2), ch);
            let state = encode_2d(channel)?;

            let out = matrix
                .get_or_insert_with(|| Array2::zeros((state.diag_even.len(), channels)));
            for i in 0..state.diag_even.len() {
                let diff = state.diag_even[i] - state.diag_odd[i];
                out[[i, ch]] = if diff > 0.0 {
                    1
                } else if diff < 0.0 {
                    -1
                } else {
                    0
                };
            }
        }

        Ok(matrix.expect("at least one channel was processed"))
    }

    fn is_similar(
        &self,
        extracted: &Array2<i8>,
        ground_truth: &GroundTruth,
        threshold: f64,
    ) -> (bool, f64) {
        if extracted.dim() != ground_truth.0.dim() {
            return (false, 0.0);
        }

        let mut total = 0usize;
        let mut correct = 0usize;
        for (&x, &g) in extracted.iter().zip(ground_truth.0.iter()) {
            if g != 0 {
                total += 1;
                if x == g {
                    correct += 1;
                }
            }
        }
        if total == 0 {
            return (false, 0.0);
        }

        let score = 100.0 * correct as f64 / total as f64;
        tracing::debug!(score, "watermark similarity score");
        (score > threshold, score)
    }
}
