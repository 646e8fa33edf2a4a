//! Embedding-position generation.
//!
//! Positions select which entries of the DCT-of-diagonal arrays carry
//! watermark symbols. They are derived from the *public* key so that any
//! verifier can reproduce them, while remaining practically unpredictable
//! without it.

mod sha256;

pub use sha256::{POSITION_SCHEMA_VERSION, Sha256ShufflePositions};

use crate::error::WatermarkError;
use crate::types::{Positions, PublicKeyDer};

/// Produces the embedding-position permutation for a public key.
///
/// Implementations must be pure: identical inputs yield identical
/// permutations, and no ambient randomness source may be touched.
pub trait PositionGenerator {
    /// Returns a permutation of `2..=length+1` for the given key.
    fn positions(
        &self,
        public_key: &PublicKeyDer,
        length: usize,
    ) -> Result<Positions, WatermarkError>;
}
