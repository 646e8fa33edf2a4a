//! High-level watermarking engine.
//!
//! Composes the three pluggable roles (watermark generator, position
//! generator, watermarking method) behind the two operations the rest
//! of the system needs: watermark an image for registration, and verify
//! a candidate against a registered ground truth.

use ndarray::Array2;

use crate::config::WatermarkConfig;
use crate::error::WatermarkError;
use crate::generator::{Sha256RsaGenerator, WatermarkGenerator};
use crate::positions::{PositionGenerator, Sha256ShufflePositions};
use crate::strategy::{Dwt2DctMethod, WatermarkMethod};
use crate::types::{GroundTruth, Image, Positions, PrivateKeyDer, PublicKeyDer};

/// Watermarking engine generic over its three roles.
///
/// The engine is stateless beyond its configuration: every operation is
/// a pure function of its arguments, so one engine instance can serve
/// concurrent callers.
pub struct WatermarkEngine<G, P, M> {
    config: WatermarkConfig,
    generator: G,
    positions: P,
    method: M,
}

impl<G, P, M> WatermarkEngine<G, P, M>
where
    G: WatermarkGenerator,
    P: PositionGenerator,
    M: WatermarkMethod,
{
    /// Constructs an engine from a configuration and its three roles.
    pub fn new(config: WatermarkConfig, generator: G, positions: P, method: M) -> Self {
        Self {
            config,
            generator,
            positions,
            method,
        }
    }

    /// The engine's embedding configuration.
    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// Derives the key-bound watermark and positions for `image` and
    /// embeds them, returning the watermarked image and the ground-truth
    /// matrix to register.
    pub fn watermark_image(
        &self,
        image: &Image,
        private_key: &PrivateKeyDer,
        public_key: &PublicKeyDer,
    ) -> Result<(Image, GroundTruth), WatermarkError> {
        let bits = self
            .generator
            .generate(image, private_key, self.config.watermark_length)?;
        let positions = self
            .positions
            .positions(public_key, self.config.watermark_length)?;
        self.method
            .embed(image, &bits, &positions, self.config.alpha)
    }

    /// Extracts the full watermark matrix of `candidate` and scores it
    /// against a registered ground truth.
    pub fn verify_image(
        &self,
        candidate: &Image,
        ground_truth: &GroundTruth,
    ) -> Result<(bool, f64), WatermarkError> {
        let extracted = self.method.extract_watermark_matrix(candidate)?;
        Ok(self
            .method
            .is_similar(&extracted, ground_truth, self.config.similarity_threshold))
    }

    /// Positioned diagnostic extraction at the key's embedding positions.
    pub fn extract_at_key_positions(
        &self,
        image: &Image,
        public_key: &PublicKeyDer,
    ) -> Result<Vec<f64>, WatermarkError> {
        let positions: Positions = self
            .positions
            .positions(public_key, self.config.watermark_length)?;
        self.method.extract(image, &positions)
    }

    /// Extracts the full signed watermark matrix of an image.
    pub fn extract_watermark_matrix(&self, image: &Image) -> Result<Array2<i8>, WatermarkError> {
        self.method.extract_watermark_matrix(image)
    }

    /// Checks that the image signature produced with `private_key`
    /// verifies under `public_key`.
    pub fn verify_signature(
        &self,
        image: &Image,
        private_key: &PrivateKeyDer,
        public_key: &PublicKeyDer,
    ) -> Result<bool, WatermarkError> {
        self.generator.verify_signature(image, private_key, public_key)
    }
}

/// The default engine stack: SHA-256/RSA watermark bits, SHA-256-seeded
/// shuffle positions, DWT²+DCT embedding.
pub type DefaultWatermarkEngine =
    WatermarkEngine<Sha256RsaGenerator, Sha256ShufflePositions, Dwt2DctMethod>;

impl DefaultWatermarkEngine {
    /// Builds the default stack from a configuration.
    pub fn with_default_stack(config: WatermarkConfig) -> Self {
        WatermarkEngine::new(
            config,
            Sha256RsaGenerator,
            Sha256ShufflePositions,
            Dwt2DctMethod,
        )
    }
}
