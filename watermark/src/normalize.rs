//! Pixel-range normalization and image-quality diagnostics.
//!
//! Every channel entering the transform cascade is first mapped to
//! `[0, scale]` with the minimum at 0 and the maximum at `scale`; embed
//! output is mapped back to the 8-bit range with truncating quantization.
//! Intermediate transform math is never quantized.

use ndarray::{Array2, ArrayView2};

use crate::error::WatermarkError;
use crate::types::Image;

/// Maps a channel affinely so its minimum becomes 0 and its maximum
/// becomes `scale`.
///
/// A zero-range (constant) channel has no such mapping and is rejected,
/// as is any channel containing non-finite samples.
pub fn normalize(channel: ArrayView2<'_, f64>, scale: f64) -> Result<Array2<f64>, WatermarkError> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in channel.iter() {
        if !v.is_finite() {
            return Err(WatermarkError::InvalidInput(
                "channel contains non-finite samples".to_string(),
            ));
        }
        min = min.min(v);
        max = max.max(v);
    }

    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return Err(WatermarkError::InvalidInput(
            "channel has zero value range and cannot be normalized".to_string(),
        ));
    }

    Ok(channel.mapv(|v| (v - min) / range * scale))
}

/// Normalizes a channel to the unit range `[0, 1]` for transform input.
pub fn normalize_unit(channel: ArrayView2<'_, f64>) -> Result<Array2<f64>, WatermarkError> {
    normalize(channel, 1.0)
}

/// Normalizes a channel to `[0, 255]` and quantizes to whole 8-bit
/// levels (truncation toward zero), the representation the watermarked
/// image is written out with.
pub fn normalize_u8(channel: ArrayView2<'_, f64>) -> Result<Array2<f64>, WatermarkError> {
    Ok(normalize(channel, 255.0)?.mapv(f64::trunc))
}

/// Peak signal-to-noise ratio between two images, with a 255 peak.
///
/// Returns `f64::INFINITY` for identical inputs.
pub fn psnr(a: &Image, b: &Image) -> Result<f64, WatermarkError> {
    if a.dim() != b.dim() {
        return Err(WatermarkError::ShapeMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let n = a.len() as f64;
    let mse = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum::<f64>()
        / n;

    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (255.0_f64 * 255.0 / mse).log10())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn normalize_pins_min_and_max() {
        let channel = arr2(&[[10.0, 20.0], [30.0, 50.0]]);
        let norm = normalize_unit(channel.view()).expect("non-constant channel");

        assert_eq!(norm[[0, 0]], 0.0);
        assert_eq!(norm[[1, 1]], 1.0);
        assert!((norm[[0, 1]] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn normalize_u8_truncates_to_whole_levels() {
        let channel = arr2(&[[0.0, 1.0], [2.0, 3.0]]);
        let norm = normalize_u8(channel.view()).expect("non-constant channel");

        assert_eq!(norm[[0, 0]], 0.0);
        assert_eq!(norm[[1, 1]], 255.0);
        // 1/3 of 255 is 85.0 exactly; 2/3 truncates from 170.0.
        assert_eq!(norm[[0, 1]], 85.0);
        assert_eq!(norm[[1, 0]], 170.0);
    }

    #[test]
    fn constant_channel_is_rejected() {
        let channel = Array2::from_elem((4, 4), 7.0);
        assert!(normalize_unit(channel.view()).is_err());
    }

    #[test]
    fn non_finite_samples_are_rejected() {
        let mut channel = Array2::zeros((2, 2));
        channel[[0, 1]] = f64::NAN;
        assert!(normalize_unit(channel.view()).is_err());
    }

    #[test]
    fn psnr_of_identical_images_is_infinite() {
        let image = Image::from_elem((4, 4, 3), 128.0);
        assert_eq!(psnr(&image, &image).unwrap(), f64::INFINITY);
    }

    #[test]
    fn psnr_decreases_with_distortion() {
        let image = Image::from_shape_fn((8, 8, 1), |(i, j, _)| (i * 8 + j) as f64);
        let slightly_off = image.mapv(|v| v + 1.0);
        let badly_off = image.mapv(|v| v + 10.0);

        let high = psnr(&image, &slightly_off).unwrap();
        let low = psnr(&image, &badly_off).unwrap();
        assert!(high > low);
    }
}
