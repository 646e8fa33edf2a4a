//! Watermark library crate.
//!
//! This crate provides the core building blocks for content-integrity
//! verification of images through invisible frequency-domain watermarks:
//!
//! - strongly-typed domain types (`types`),
//! - the DWT -> DWT -> DCT frequency transform cascade (`transform`),
//! - key-bound watermark bit generation (`generator`),
//! - key-derived embedding positions (`positions`),
//! - the dual-diagonal embedding/extraction strategy (`strategy`),
//! - RSA key management (`keys`),
//! - pixel-range normalization and PSNR diagnostics (`normalize`),
//! - registration-ledger backends (`registry`),
//! - and a composing engine plus top-level configuration (`engine`,
//!   `config`).
//!
//! Higher-level binaries and services compose these pieces to register
//! images and verify candidates against registered ground truths.

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod keys;
pub mod normalize;
pub mod positions;
pub mod registry;
pub mod strategy;
pub mod transform;
pub mod types;

// Re-export top-level configuration types.
pub use config::{AppConfig, RegistryConfig, WatermarkConfig};

// Re-export the engine and the error type.
pub use engine::{DefaultWatermarkEngine, WatermarkEngine};
pub use error::WatermarkError;

// Re-export the three role traits and their default implementations.
pub use generator::{Sha256RsaGenerator, WatermarkGenerator};
pub use positions::{POSITION_SCHEMA_VERSION, PositionGenerator, Sha256ShufflePositions};
pub use strategy::{Dwt2DctMethod, WatermarkMethod, embedding_capacity};

// Re-export key management and ledger backends.
pub use keys::{DEFAULT_KEY_BITS, generate_keys};
pub use registry::{
    InMemoryRegistry, JsonFileRegistry, RegisteredWatermark, RegistryError, WatermarkRegistry,
};

// Re-export domain types at the crate root for convenience.
pub use types::*;
