// src/main.rs
//
// Minimal demo binary that wires up the watermark library:
//
// - fresh RSA key pair
// - synthetic RGB test image (no image I/O in the core)
// - embed, register in a JSON-file ledger, verify, report PSNR.

use watermark::{
    AppConfig, DefaultWatermarkEngine, ImageDigest, JsonFileRegistry, RegisteredWatermark,
    WatermarkRegistry, generate_keys, image_to_bytes,
    normalize::psnr,
    types::Image,
};

fn main() {
    // Basic tracing setup.
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "watermark=debug".to_string()),
        )
        .init();

    if let Err(err) = run() {
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    // For now, just use defaults. Later this can be loaded from a
    // file/CLI/env.
    let cfg = AppConfig::default();

    // ---------------------------
    // Key pair
    // ---------------------------

    let (private_key, public_key) = generate_keys(cfg.watermark.rsa_key_bits)
        .map_err(|e| format!("failed to generate RSA keys: {e}"))?;
    tracing::info!(bits = cfg.watermark.rsa_key_bits, "generated RSA key pair");

    // ---------------------------
    // Synthetic test image
    // ---------------------------

    let original = synthetic_image(256, 256);

    // ---------------------------
    // Embed + register
    // ---------------------------

    let engine = DefaultWatermarkEngine::with_default_stack(cfg.watermark.clone());

    let (watermarked, ground_truth) = engine
        .watermark_image(&original, &private_key, &public_key)
        .map_err(|e| format!("embedding failed: {e}"))?;

    let digest = ImageDigest::compute(&image_to_bytes(&watermarked));
    let mut registry = JsonFileRegistry::open(&cfg.registry)
        .map_err(|e| format!("failed to open registry at {}: {e}", cfg.registry.path))?;
    registry
        .register(RegisteredWatermark {
            image_digest: digest,
            image_path: "demo/watermarked.png".to_string(),
            ground_truth: ground_truth.clone(),
        })
        .map_err(|e| format!("failed to register watermark: {e}"))?;

    tracing::info!(
        digest = %digest.to_hex(),
        registry = %cfg.registry.path,
        "registered watermarked image"
    );

    // ---------------------------
    // Verify the candidate
    // ---------------------------

    let (passed, score) = engine
        .verify_image(&watermarked, &ground_truth)
        .map_err(|e| format!("verification failed: {e}"))?;

    let quality = psnr(&original, &watermarked)
        .map_err(|e| format!("PSNR computation failed: {e}"))?;

    let signed = engine
        .verify_signature(&original, &private_key, &public_key)
        .map_err(|e| format!("signature check failed: {e}"))?;

    println!("watermark verified: {passed} (score {score:.1}, threshold {})",
        engine.config().similarity_threshold);
    println!("signature valid:    {signed}");
    println!("visual quality:     {quality:.1} dB PSNR at alpha {}", engine.config().alpha);

    Ok(())
}

/// Deterministic RGB test pattern with enough per-channel variation to
/// normalize and embed into.
fn synthetic_image(height: usize, width: usize) -> Image {
    Image::from_shape_fn((height, width, 3), |(i, j, c)| {
        let x = j as f64 / width as f64;
        let y = i as f64 / height as f64;
        let wave = ((x * 9.0 + c as f64).sin() + (y * 7.0).cos()) * 48.0;
        (128.0 + wave + (x * y * 64.0)).clamp(0.0, 255.0).trunc()
    })
}
