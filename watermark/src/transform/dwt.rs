//! 2D Daubechies-1 (Haar) wavelet transform with symmetric boundary
//! extension.
//!
//! The analysis step pairs samples `(x[2i], x[2i+1])` into averages and
//! differences scaled by `1/sqrt(2)`. Odd-length signals duplicate the
//! edge sample, so every sub-band has `ceil(n/2)` samples along each
//! axis; the synthesis step always reconstructs the even-length signal
//! `2*ceil(n/2)` and callers crop back to the original extent.

use ndarray::{Array2, ArrayView2, s};

/// The four sub-bands of one 2D decomposition level.
#[derive(Debug, Clone)]
pub struct WaveletBands {
    /// Approximation (low-pass both axes).
    pub ll: Array2<f64>,
    /// Horizontal detail (low-pass rows, high-pass columns).
    pub lh: Array2<f64>,
    /// Vertical detail (high-pass rows, low-pass columns).
    pub hl: Array2<f64>,
    /// Diagonal detail (high-pass both axes).
    pub hh: Array2<f64>,
}

const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// 1D analysis: pairwise averages and differences, edge sample duplicated
/// for odd lengths.
fn analyze_1d(signal: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = signal.len();
    let half = n.div_ceil(2);
    let mut low = Vec::with_capacity(half);
    let mut high = Vec::with_capacity(half);

    for i in 0..half {
        let a = signal[2 * i];
        let b = if 2 * i + 1 < n { signal[2 * i + 1] } else { a };
        low.push((a + b) / SQRT_2);
        high.push((a - b) / SQRT_2);
    }

    (low, high)
}

/// 1D synthesis: exact inverse of [`analyze_1d`] up to the duplicated
/// edge sample. Always returns `2 * low.len()` samples.
fn synthesize_1d(low: &[f64], high: &[f64]) -> Vec<f64> {
    debug_assert_eq!(low.len(), high.len());
    let mut signal = Vec::with_capacity(2 * low.len());
    for (&l, &h) in low.iter().zip(high) {
        signal.push((l + h) / SQRT_2);
        signal.push((l - h) / SQRT_2);
    }
    signal
}

/// One level of 2D decomposition: rows first, then columns.
pub fn dwt2(data: ArrayView2<'_, f64>) -> WaveletBands {
    let (rows, cols) = data.dim();
    let half_r = rows.div_ceil(2);
    let half_c = cols.div_ceil(2);

    // Filter along each row.
    let mut row_low = Array2::<f64>::zeros((rows, half_c));
    let mut row_high = Array2::<f64>::zeros((rows, half_c));
    for i in 0..rows {
        let row = data.row(i).to_vec();
        let (low, high) = analyze_1d(&row);
        for j in 0..half_c {
            row_low[[i, j]] = low[j];
            row_high[[i, j]] = high[j];
        }
    }

    // Filter along each column of both halves.
    let mut ll = Array2::<f64>::zeros((half_r, half_c));
    let mut lh = Array2::<f64>::zeros((half_r, half_c));
    let mut hl = Array2::<f64>::zeros((half_r, half_c));
    let mut hh = Array2::<f64>::zeros((half_r, half_c));
    for j in 0..half_c {
        let col_l = row_low.column(j).to_vec();
        let (low, high) = analyze_1d(&col_l);
        for i in 0..half_r {
            ll[[i, j]] = low[i];
            hl[[i, j]] = high[i];
        }

        let col_h = row_high.column(j).to_vec();
        let (low, high) = analyze_1d(&col_h);
        for i in 0..half_r {
            lh[[i, j]] = low[i];
            hh[[i, j]] = high[i];
        }
    }

    WaveletBands { ll, lh, hl, hh }
}

/// One level of 2D reconstruction: columns first, then rows.
///
/// The output has shape `(2 * band_rows, 2 * band_cols)`; the caller
/// crops to the forward input's extent when that was odd.
pub fn idwt2(
    ll: &Array2<f64>,
    lh: &Array2<f64>,
    hl: &Array2<f64>,
    hh: &Array2<f64>,
) -> Array2<f64> {
    let (half_r, half_c) = ll.dim();
    let rows = 2 * half_r;
    let cols = 2 * half_c;

    // Invert the column filtering of both halves.
    let mut row_low = Array2::<f64>::zeros((rows, half_c));
    let mut row_high = Array2::<f64>::zeros((rows, half_c));
    for j in 0..half_c {
        let low_l = ll.column(j).to_vec();
        let high_l = hl.column(j).to_vec();
        let col = synthesize_1d(&low_l, &high_l);
        for i in 0..rows {
            row_low[[i, j]] = col[i];
        }

        let low_h = lh.column(j).to_vec();
        let high_h = hh.column(j).to_vec();
        let col = synthesize_1d(&low_h, &high_h);
        for i in 0..rows {
            row_high[[i, j]] = col[i];
        }
    }

    // Invert the row filtering.
    let mut result = Array2::<f64>::zeros((rows, cols));
    for i in 0..rows {
        let low = row_low.row(i).to_vec();
        let high = row_high.row(i).to_vec();
        let row = synthesize_1d(&low, &high);
        for j in 0..cols {
            result[[i, j]] = row[j];
        }
    }

    result
}

/// Crops `data` to `(rows, cols)` when a synthesis step produced a
/// larger array; a no-op view otherwise.
pub fn crop(data: Array2<f64>, rows: usize, cols: usize) -> Array2<f64> {
    if data.dim() == (rows, cols) {
        data
    } else {
        data.slice(s![0..rows, 0..cols]).to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_of_even_signal() {
        let (low, high) = analyze_1d(&[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(low.len(), 2);
        assert!((low[0] - 3.0 / SQRT_2).abs() < 1e-12);
        assert!((high[0] + 1.0 / SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn odd_signal_duplicates_the_edge_sample() {
        let (low, high) = analyze_1d(&[1.0, 2.0, 5.0]);

        assert_eq!(low.len(), 2);
        // The trailing sample pairs with itself: average sqrt(2)*x, detail 0.
        assert!((low[1] - SQRT_2 * 5.0).abs() < 1e-12);
        assert_eq!(high[1], 0.0);
    }

    #[test]
    fn roundtrip_1d_even() {
        let original = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let (low, high) = analyze_1d(&original);
        let back = synthesize_1d(&low, &high);

        for (a, b) in original.iter().zip(&back) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn roundtrip_2d_even_dims() {
        let data = Array2::from_shape_fn((8, 8), |(i, j)| (i * 8 + j) as f64);
        let bands = dwt2(data.view());
        let back = idwt2(&bands.ll, &bands.lh, &bands.hl, &bands.hh);

        for i in 0..8 {
            for j in 0..8 {
                assert!((data[[i, j]] - back[[i, j]]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn roundtrip_2d_odd_dims_after_crop() {
        let data = Array2::from_shape_fn((7, 5), |(i, j)| ((i + 1) * (j + 2)) as f64);
        let bands = dwt2(data.view());
        assert_eq!(bands.ll.dim(), (4, 3));

        let back = crop(
            idwt2(&bands.ll, &bands.lh, &bands.hl, &bands.hh),
            7,
            5,
        );
        for i in 0..7 {
            for j in 0..5 {
                assert!((data[[i, j]] - back[[i, j]]).abs() < 1e-10);
            }
        }
    }
}
