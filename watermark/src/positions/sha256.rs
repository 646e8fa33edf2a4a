//! SHA-256-seeded shuffle positions.

use rand::RngCore;
use rand_mt::Mt19937GenRand32;
use sha2::{Digest, Sha256};

use crate::error::WatermarkError;
use crate::positions::PositionGenerator;
use crate::types::{Positions, PublicKeyDer};

/// Version of the position-derivation scheme.
///
/// Version 1: seed = low 32 bits of the big-endian SHA-256 digest of the
/// public key DER; permutation of `2..=length+1` by a downward
/// Fisher-Yates pass over MT19937 with mask-and-reject bounded draws.
/// Bit-compatible with NumPy's legacy `RandomState` shuffle for 32-bit
/// integer seeds, so permutations agree with NumPy-based embedders.
pub const POSITION_SCHEMA_VERSION: u8 = 1;

/// Position generator that shuffles `2..=length+1` with a key-seeded,
/// locally scoped Mersenne Twister.
///
/// The PRNG instance lives on the stack of each call: concurrent callers
/// never contend on or observe shared generator state.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256ShufflePositions;

impl PositionGenerator for Sha256ShufflePositions {
    fn positions(
        &self,
        public_key: &PublicKeyDer,
        length: usize,
    ) -> Result<Positions, WatermarkError> {
        if length == 0 {
            return Err(WatermarkError::InvalidInput(
                "watermark length must be at least 1".to_string(),
            ));
        }

        let seed = derive_seed(public_key);
        let mut rng = Mt19937GenRand32::new(seed);

        // Start index 2 skips the DC coefficient of each diagonal array.
        let mut positions: Vec<usize> = (2..=length + 1).collect();
        for i in (1..positions.len()).rev() {
            let j = draw_bounded(&mut rng, i as u32) as usize;
            positions.swap(i, j);
        }

        Ok(Positions(positions))
    }
}

/// Low 32 bits of the big-endian digest of the key, i.e.
/// `big_endian_integer(SHA-256(key)) mod 2^32`.
fn derive_seed(public_key: &PublicKeyDer) -> u32 {
    let digest = Sha256::digest(public_key.as_bytes());
    u32::from_be_bytes(digest[28..32].try_into().expect("digest is 32 bytes"))
}

/// Uniform draw from `0..=max` by masking to the covering power of two
/// and rejecting overshoots.
///
/// The rejection loop is part of the interoperability contract: a
/// different bounded-draw strategy over the same PRNG stream yields a
/// different permutation.
fn draw_bounded(rng: &mut Mt19937GenRand32, max: u32) -> u32 {
    let mut mask = max;
    mask |= mask >> 1;
    mask |= mask >> 2;
    mask |= mask >> 4;
    mask |= mask >> 8;
    mask |= mask >> 16;

    loop {
        let value = rng.next_u32() & mask;
        if value <= max {
            return value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(bytes: &[u8]) -> PublicKeyDer {
        PublicKeyDer(bytes.to_vec())
    }

    #[test]
    fn mt19937_reference_stream() {
        // First output of the reference MT19937 for the canonical seed.
        let mut rng = Mt19937GenRand32::new(5489);
        assert_eq!(rng.next_u32(), 3_499_211_612);
    }

    #[test]
    fn positions_are_a_permutation_of_the_expected_range() {
        let generator = Sha256ShufflePositions;
        let positions = generator.positions(&key(b"public-key"), 255).unwrap();

        assert_eq!(positions.len(), 255);
        let mut sorted = positions.as_slice().to_vec();
        sorted.sort_unstable();
        let expected: Vec<usize> = (2..=256).collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn positions_are_deterministic_per_key() {
        let generator = Sha256ShufflePositions;
        let a = generator.positions(&key(b"alice"), 64).unwrap();
        let b = generator.positions(&key(b"alice"), 64).unwrap();
        let c = generator.positions(&key(b"bob"), 64).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn single_position_is_the_fixed_start_index() {
        let generator = Sha256ShufflePositions;
        let positions = generator.positions(&key(b"any"), 1).unwrap();
        assert_eq!(positions.as_slice(), &[2]);
    }

    #[test]
    fn zero_length_is_rejected() {
        let generator = Sha256ShufflePositions;
        assert!(matches!(
            generator.positions(&key(b"any"), 0),
            Err(WatermarkError::InvalidInput(_))
        ));
    }

    #[test]
    fn bounded_draw_respects_its_bound() {
        let mut rng = Mt19937GenRand32::new(1);
        for max in [1u32, 2, 3, 7, 10, 255, 1000] {
            for _ in 0..200 {
                assert!(draw_bounded(&mut rng, max) <= max);
            }
        }
    }
}
