//! Watermark bit-sequence generation.
//!
//! A watermark is a key-bound sequence of `+1`/`-1` symbols derived from
//! the image itself: without the private key nobody can produce the
//! sequence, and with the public key anybody can check that it was
//! produced by the key holder.

mod sha256;

pub use sha256::Sha256RsaGenerator;

use crate::error::WatermarkError;
use crate::types::{Image, PrivateKeyDer, PublicKeyDer, WatermarkBits};

/// Produces a watermark bit sequence for an image and a key.
///
/// Implementations must be deterministic: identical `(image, key,
/// length)` inputs yield identical sequences.
pub trait WatermarkGenerator {
    /// Derives a `length`-symbol watermark from `image` and the private
    /// key.
    fn generate(
        &self,
        image: &Image,
        private_key: &PrivateKeyDer,
        length: usize,
    ) -> Result<WatermarkBits, WatermarkError>;

    /// Recomputes the image signature with the private key and checks it
    /// against the public key.
    ///
    /// Returns `Ok(false)` for a mismatched pair; only key-parsing
    /// problems are errors.
    fn verify_signature(
        &self,
        image: &Image,
        private_key: &PrivateKeyDer,
        public_key: &PublicKeyDer,
    ) -> Result<bool, WatermarkError>;
}
