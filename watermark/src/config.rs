//! Top-level configuration for the watermarking stack.
//!
//! This module aggregates configuration for:
//!
//! - embedding parameters (`WatermarkConfig`),
//! - the registration ledger (`RegistryConfig`).
//!
//! The goal is a single `AppConfig` struct that higher-level binaries
//! can construct from defaults, config files, or environment variables
//! as needed.

use crate::keys::DEFAULT_KEY_BITS;

/// Embedding and verification parameters.
#[derive(Clone, Debug)]
pub struct WatermarkConfig {
    /// Number of watermark symbols derived from the image signature.
    /// Bounded by the signature bit length and the image's embedding
    /// capacity.
    pub watermark_length: usize,
    /// Embedding strength in `(0, 1]`: how far the two interleaved
    /// diagonals are pushed apart at watermarked positions. Lower is
    /// less visible, higher survives more distortion.
    pub alpha: f64,
    /// Similarity percentage a candidate must strictly exceed to count
    /// as watermarked.
    pub similarity_threshold: f64,
    /// RSA modulus size used when generating fresh key pairs.
    pub rsa_key_bits: usize,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            watermark_length: 255,
            alpha: 0.1,
            similarity_threshold: 80.0,
            rsa_key_bits: DEFAULT_KEY_BITS,
        }
    }
}

/// Configuration for the JSON-file registration ledger.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Filesystem path of the ledger file.
    pub path: String,
    /// Whether to start an empty ledger when the file does not exist.
    pub create_if_missing: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: "data/watermark-registry.json".to_string(),
            create_if_missing: true,
        }
    }
}

/// Aggregated configuration for binaries embedding the full stack.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub watermark: WatermarkConfig,
    pub registry: RegistryConfig,
}
