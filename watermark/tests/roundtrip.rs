//! End-to-end scenarios: embed, extract, and score across key pairs,
//! strengths, and capacity limits.

use std::sync::OnceLock;

use ndarray::Array2;

use watermark::normalize::psnr;
use watermark::types::Image;
use watermark::{
    Dwt2DctMethod, GroundTruth, PositionGenerator, PrivateKeyDer, PublicKeyDer,
    Sha256RsaGenerator, Sha256ShufflePositions, WatermarkConfig, WatermarkEngine,
    WatermarkGenerator, WatermarkMethod, embedding_capacity, generate_keys,
};

/// One shared 1024-bit pair: RSA generation dominates test time and the
/// scenarios only need a valid pair, not a fresh one.
fn test_keys() -> &'static (PrivateKeyDer, PublicKeyDer) {
    static KEYS: OnceLock<(PrivateKeyDer, PublicKeyDer)> = OnceLock::new();
    KEYS.get_or_init(|| generate_keys(1024).expect("RSA key generation"))
}

fn test_image(height: usize, width: usize) -> Image {
    let mut image = Image::from_shape_fn((height, width, 3), |(i, j, c)| {
        let x = j as f64 / width as f64;
        let y = i as f64 / height as f64;
        let wave = ((x * 11.0 + c as f64 * 0.8).sin() + (y * 5.0).cos()) * 52.0;
        (128.0 + wave + x * y * 40.0).clamp(0.0, 255.0).trunc()
    });
    // Pin each channel to the full 8-bit range so the output
    // renormalization after embedding is close to the identity and PSNR
    // reflects the embedding strength rather than a contrast stretch.
    for c in 0..3 {
        image[[0, 0, c]] = 0.0;
        image[[height - 1, width - 1, c]] = 255.0;
    }
    image
}

fn engine(length: usize, alpha: f64) -> WatermarkEngine<Sha256RsaGenerator, Sha256ShufflePositions, Dwt2DctMethod>
{
    let config = WatermarkConfig {
        watermark_length: length,
        alpha,
        ..WatermarkConfig::default()
    };
    WatermarkEngine::new(
        config,
        Sha256RsaGenerator,
        Sha256ShufflePositions,
        Dwt2DctMethod,
    )
}

#[test]
fn lossless_roundtrip_scores_100() {
    let (private_key, public_key) = test_keys();
    let engine = engine(255, 0.1);
    let image = test_image(128, 128);

    let (watermarked, ground_truth) = engine
        .watermark_image(&image, private_key, public_key)
        .expect("embedding succeeds");

    let (passed, score) = engine
        .verify_image(&watermarked, &ground_truth)
        .expect("verification succeeds");

    assert!(passed);
    assert_eq!(score, 100.0);
}

#[test]
fn foreign_positions_score_near_chance() {
    let (private_key, public_key) = test_keys();
    let (_, unrelated_public) = generate_keys(1024).expect("second pair");

    let length = 255;
    let engine = engine(length, 0.1);
    let image = test_image(128, 128);

    let (watermarked, ground_truth) = engine
        .watermark_image(&image, private_key, public_key)
        .expect("embedding succeeds");

    // Rebuild a ground truth as a verifier holding the wrong public key
    // would: same bits, but placed at that key's permutation.
    let bits = Sha256RsaGenerator
        .generate(&image, private_key, length)
        .expect("watermark bits");
    let foreign_positions = Sha256ShufflePositions
        .positions(&unrelated_public, length)
        .expect("foreign positions");

    let (rows, cols) = ground_truth.shape();
    let mut foreign = Array2::<i8>::zeros((rows, cols));
    for ch in 0..cols {
        for (&symbol, &pos) in bits.as_slice().iter().zip(foreign_positions.as_slice()) {
            foreign[[pos, ch]] = symbol;
        }
    }

    let (passed, score) = engine
        .verify_image(&watermarked, &GroundTruth(foreign))
        .expect("verification runs");

    // Both permutations cover the same index range, so the wrong key
    // reads real symbols in the wrong order: agreement is coin-flip.
    assert!(!passed);
    assert!(score > 25.0 && score < 75.0, "score was {score}");
}

#[test]
fn inverted_ground_truth_scores_zero() {
    let (private_key, public_key) = test_keys();
    let engine = engine(100, 0.1);
    let image = test_image(64, 64);

    let (watermarked, ground_truth) = engine
        .watermark_image(&image, private_key, public_key)
        .expect("embedding succeeds");

    let inverted = GroundTruth(ground_truth.0.mapv(|v| -v));
    let (passed, score) = engine
        .verify_image(&watermarked, &inverted)
        .expect("verification runs");

    assert!(!passed);
    assert_eq!(score, 0.0);
}

#[test]
fn alpha_sweep_keeps_perfect_scores_and_degrades_psnr() {
    let (private_key, public_key) = test_keys();
    let image = test_image(64, 64);

    let mut quality = Vec::new();
    for alpha in [0.05, 0.2, 0.9] {
        let engine = engine(100, alpha);
        let (watermarked, ground_truth) = engine
            .watermark_image(&image, private_key, public_key)
            .expect("embedding succeeds");

        let (passed, score) = engine
            .verify_image(&watermarked, &ground_truth)
            .expect("verification succeeds");
        assert!(passed, "alpha {alpha} failed verification");
        assert_eq!(score, 100.0, "alpha {alpha} scored {score}");

        quality.push(psnr(&image, &watermarked).expect("same shapes"));
    }

    // Stronger embedding distorts more.
    assert!(quality[0] > quality[1]);
    assert!(quality[1] > quality[2]);
}

#[test]
fn capacity_bound_is_enforced() {
    let (private_key, public_key) = test_keys();
    let image = test_image(64, 64);

    // A 64x64 channel leaves a 16x16 approximation band: 256 zig-zag
    // entries, diagonals of 128, 126 usable positions.
    let capacity = embedding_capacity(64, 64);
    assert_eq!(capacity, 126);

    let at_limit = engine(capacity, 0.1);
    assert!(
        at_limit
            .watermark_image(&image, private_key, public_key)
            .is_ok()
    );

    let over_limit = engine(capacity + 1, 0.1);
    let err = over_limit
        .watermark_image(&image, private_key, public_key)
        .unwrap_err();
    assert!(matches!(
        err,
        watermark::WatermarkError::InsufficientCapacity { .. }
    ));
}

#[test]
fn similarity_with_mismatched_channel_counts_is_rejected_quietly() {
    let method = Dwt2DctMethod;
    let extracted = Array2::<i8>::ones((128, 3));
    let ground_truth = GroundTruth(Array2::<i8>::ones((128, 1)));

    assert_eq!(method.is_similar(&extracted, &ground_truth, 80.0), (false, 0.0));
}

#[test]
fn signature_verifies_only_with_the_matching_pair() {
    let (private_key, public_key) = test_keys();
    let (_, unrelated_public) = generate_keys(1024).expect("second pair");
    let engine = engine(64, 0.1);
    let image = test_image(64, 64);

    assert!(
        engine
            .verify_signature(&image, private_key, public_key)
            .expect("signature check runs")
    );
    assert!(
        !engine
            .verify_signature(&image, private_key, &unrelated_public)
            .expect("signature check runs")
    );
}
