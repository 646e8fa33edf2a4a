//! Frequency transform cascade: DWT -> DWT -> zig-zag -> split -> DCT.
//!
//! A channel is decomposed with two levels of the db1 wavelet, the
//! second-level approximation band is linearized in zig-zag order, the
//! flat sequence is split into two interleaved sub-sequences, and each
//! sub-sequence is transformed with an orthonormal 1D DCT. Watermark
//! symbols are modulated onto the two DCT arrays; the inverse walks the
//! same stages backwards, cropping at each level where symmetric
//! boundary extension enlarged a band.

pub mod dct;
pub mod dwt;
pub mod zigzag;

use ndarray::{Array2, ArrayView2};

use crate::error::WatermarkError;

pub use dct::{dct_ortho, idct_ortho};
pub use dwt::{WaveletBands, dwt2, idwt2};
pub use zigzag::{inverse_zigzag, zigzag};

/// Minimum channel extent: two wavelet levels halve each axis twice.
pub const MIN_CHANNEL_DIM: usize = 4;

/// All intermediate products of one forward transform of one channel.
///
/// Held together so the inverse can be driven from the exact bands the
/// forward pass produced, with only the diagonal DCT arrays modified in
/// between.
#[derive(Debug, Clone)]
pub struct FrequencyState {
    /// First-level wavelet bands of the channel.
    pub level1: WaveletBands,
    /// Second-level wavelet bands (decomposition of `level1.ll`).
    pub level2: WaveletBands,
    /// DCT of the odd-indexed elements of the zig-zag sequence.
    ///
    /// The "even" name is historical and load-bearing for
    /// interoperability: this array really holds `v[1], v[3], ...`.
    pub diag_even: Vec<f64>,
    /// DCT of the even-indexed elements (`v[0], v[2], ...`).
    pub diag_odd: Vec<f64>,
}

impl FrequencyState {
    /// Length of the shorter diagonal array, the bound on usable
    /// embedding indices.
    pub fn min_diagonal_len(&self) -> usize {
        self.diag_even.len().min(self.diag_odd.len())
    }
}

/// Forward cascade for a single channel.
pub fn encode_2d(channel: ArrayView2<'_, f64>) -> Result<FrequencyState, WatermarkError> {
    let (rows, cols) = channel.dim();
    if rows < MIN_CHANNEL_DIM || cols < MIN_CHANNEL_DIM {
        return Err(WatermarkError::InvalidInput(format!(
            "channel of {rows}x{cols} is too small for two wavelet levels (need at least {MIN_CHANNEL_DIM}x{MIN_CHANNEL_DIM})"
        )));
    }

    let level1 = dwt2(channel);
    let level2 = dwt2(level1.ll.view());

    let (flat, _) = zigzag(&level2.ll);
    let even: Vec<f64> = flat.iter().skip(1).step_by(2).copied().collect();
    let odd: Vec<f64> = flat.iter().step_by(2).copied().collect();

    let diag_even = dct_ortho(&even);
    let diag_odd = dct_ortho(&odd);

    if !all_finite(&diag_even) || !all_finite(&diag_odd) {
        return Err(WatermarkError::TransformFailure(
            "forward cascade produced non-finite diagonal coefficients".to_string(),
        ));
    }

    Ok(FrequencyState {
        level1,
        level2,
        diag_even,
        diag_odd,
    })
}

/// Inverse cascade: rebuilds a channel of `target_shape` from a
/// (possibly modulated) frequency state.
pub fn decode_2d(
    state: &FrequencyState,
    target_shape: (usize, usize),
) -> Result<Array2<f64>, WatermarkError> {
    let (ll2_rows, ll2_cols) = state.level2.ll.dim();
    let total = ll2_rows * ll2_cols;
    if state.diag_even.len() + state.diag_odd.len() != total {
        return Err(WatermarkError::ShapeMismatch {
            expected: total,
            actual: state.diag_even.len() + state.diag_odd.len(),
        });
    }

    let even = idct_ortho(&state.diag_even);
    let odd = idct_ortho(&state.diag_odd);

    // Re-interleave: odd-indexed slots from `even`, even-indexed from `odd`.
    let mut flat = vec![0.0; total];
    for (slot, value) in flat.iter_mut().skip(1).step_by(2).zip(&even) {
        *slot = *value;
    }
    for (slot, value) in flat.iter_mut().step_by(2).zip(&odd) {
        *slot = *value;
    }

    let ll2 = inverse_zigzag(&flat, ll2_rows, ll2_cols)?;

    let (ll1_rows, ll1_cols) = state.level1.ll.dim();
    let ll1 = dwt::crop(
        idwt2(&ll2, &state.level2.lh, &state.level2.hl, &state.level2.hh),
        ll1_rows,
        ll1_cols,
    );

    let channel = dwt::crop(
        idwt2(&ll1, &state.level1.lh, &state.level1.hl, &state.level1.hh),
        target_shape.0,
        target_shape.1,
    );

    if channel.iter().any(|v| !v.is_finite()) {
        return Err(WatermarkError::TransformFailure(
            "inverse cascade produced non-finite samples".to_string(),
        ));
    }

    Ok(channel)
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_channel(rows: usize, cols: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, cols), |(i, j)| {
            (i as f64 * 0.31).sin() * 40.0 + (j as f64 * 0.17).cos() * 25.0 + (i * j % 13) as f64
        })
    }

    #[test]
    fn diagonal_lengths_partition_the_approximation_band() {
        let channel = test_channel(16, 16);
        let state = encode_2d(channel.view()).unwrap();

        let (r2, c2) = state.level2.ll.dim();
        assert_eq!(state.diag_even.len() + state.diag_odd.len(), r2 * c2);
        // The odd-indexed split never exceeds the even-indexed one.
        assert!(state.diag_even.len() <= state.diag_odd.len());
    }

    #[test]
    fn roundtrip_reconstructs_within_tolerance() {
        for &(rows, cols) in &[(16usize, 16usize), (8, 12), (15, 9), (7, 21)] {
            let channel = test_channel(rows, cols);
            let state = encode_2d(channel.view()).unwrap();
            let back = decode_2d(&state, (rows, cols)).unwrap();

            assert_eq!(back.dim(), (rows, cols));
            for i in 0..rows {
                for j in 0..cols {
                    assert!(
                        (channel[[i, j]] - back[[i, j]]).abs() <= 1e-9,
                        "residual too large at ({i}, {j}) for {rows}x{cols}"
                    );
                }
            }
        }
    }

    #[test]
    fn undersized_channel_is_rejected() {
        let channel = Array2::<f64>::zeros((3, 16));
        assert!(matches!(
            encode_2d(channel.view()),
            Err(WatermarkError::InvalidInput(_))
        ));
    }

    #[test]
    fn decode_rejects_diagonal_length_drift() {
        let channel = test_channel(16, 16);
        let mut state = encode_2d(channel.view()).unwrap();
        state.diag_even.pop();

        assert!(matches!(
            decode_2d(&state, (16, 16)),
            Err(WatermarkError::ShapeMismatch { .. })
        ));
    }
}
