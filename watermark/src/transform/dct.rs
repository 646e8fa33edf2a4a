//! Orthonormal 1D discrete cosine transform (DCT-II and its inverse).
//!
//! The unitary variant: both directions carry the `sqrt(1/N)` /
//! `sqrt(2/N)` weights, so forward and inverse are mutual adjoints and
//! the transform preserves the Euclidean norm. Direct O(N^2) evaluation;
//! the diagonal sequences this crate transforms are short enough that a
//! fast algorithm would not pay for itself.

use std::f64::consts::PI;

/// Forward orthonormal DCT-II.
pub fn dct_ortho(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let w0 = (1.0 / n as f64).sqrt();
    let w = (2.0 / n as f64).sqrt();

    (0..n)
        .map(|k| {
            let sum: f64 = signal
                .iter()
                .enumerate()
                .map(|(i, &x)| x * (PI * (2 * i + 1) as f64 * k as f64 / (2 * n) as f64).cos())
                .sum();
            if k == 0 { w0 * sum } else { w * sum }
        })
        .collect()
}

/// Inverse orthonormal DCT (DCT-III with matching weights).
pub fn idct_ortho(coeffs: &[f64]) -> Vec<f64> {
    let n = coeffs.len();
    if n == 0 {
        return Vec::new();
    }

    let w0 = (1.0 / n as f64).sqrt();
    let w = (2.0 / n as f64).sqrt();

    (0..n)
        .map(|i| {
            coeffs
                .iter()
                .enumerate()
                .map(|(k, &c)| {
                    let weight = if k == 0 { w0 } else { w };
                    weight * c * (PI * (2 * i + 1) as f64 * k as f64 / (2 * n) as f64).cos()
                })
                .sum()
        })
        .collect()
}
