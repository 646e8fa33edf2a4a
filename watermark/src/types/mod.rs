//! Core domain types used by the watermarking engine.
//!
//! This module defines strongly-typed wrappers for key material, watermark
//! bit sequences, embedding positions, and the ground-truth matrix that is
//! persisted in the registration ledger. The goal is to avoid "naked" byte
//! buffers and integer vectors in public APIs and instead use
//! domain-specific newtypes.

use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::WatermarkError;

/// An image as a real-valued `(height, width, channels)` tensor.
///
/// Pixel values are expected in `[0, 255]` on the API boundary; all
/// internal transform math runs in `f64` regardless.
pub type Image = Array3<f64>;

/// Length in bytes of the SHA-256 content digests used as ledger keys.
pub const DIGEST_LEN: usize = 32;

/// SHA-256 digest of an image's canonical byte serialization.
///
/// Used as the registration-ledger key and as the hash that is signed by
/// the watermark generator. Always exactly [`DIGEST_LEN`] bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ImageDigest(pub [u8; DIGEST_LEN]);

impl ImageDigest {
    /// Computes the SHA-256 digest of an arbitrary byte slice.
    pub fn compute(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        ImageDigest(digest.into())
    }

    /// Computes the digest of an image's canonical serialization.
    pub fn of_image(image: &Image) -> Self {
        Self::compute(&image_to_bytes(image))
    }

    /// Returns the underlying 32-byte digest as a borrowed array.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Hex rendering, for logs and API payloads.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// RSA private key in DER encoding (PKCS#8, PKCS#1 accepted on parse).
///
/// This type is intentionally opaque: it does not interpret or validate
/// the key material, it only carries it through the API in a structured
/// way. The private key never leaves the registering party.
#[derive(Clone, Serialize, Deserialize)]
pub struct PrivateKeyDer(pub Vec<u8>);

impl PrivateKeyDer {
    /// Returns the raw DER bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Omits the key bytes so key material cannot leak through debug logging.
impl std::fmt::Debug for PrivateKeyDer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKeyDer({} bytes)", self.0.len())
    }
}

/// RSA public key in DER encoding (SPKI, PKCS#1 accepted on parse).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicKeyDer(pub Vec<u8>);

impl PublicKeyDer {
    /// Returns the raw DER bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A watermark bit sequence: values in `{+1, -1}`, derived from an RSA
/// signature over the image hash.
///
/// The sequence is a pure function of `(image, private_key, length)` and
/// is never persisted; verifiers score against the ground-truth matrix
/// instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WatermarkBits(pub Vec<i8>);

impl WatermarkBits {
    /// Number of watermark symbols.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the sequence holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the symbols as a slice of `+1`/`-1` values.
    pub fn as_slice(&self) -> &[i8] {
        &self.0
    }
}

/// A position vector: a key-dependent permutation of the integers
/// `2..=length+1`, indexing into the DCT-of-diagonal arrays.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Positions(pub Vec<usize>);

impl Positions {
    /// Number of positions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the vector holds no positions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the positions as a slice of diagonal-array indices.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// The ground-truth watermark matrix produced at embed time.
///
/// Shape `(diagonal_length, channels)`: one column per image channel,
/// zero everywhere except at the embedding positions, which hold the
/// watermark symbols. This is the artifact handed to the registration
/// ledger and scored against at verification time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroundTruth(pub Array2<i8>);

impl GroundTruth {
    /// Shape as `(diagonal_length, channels)`.
    pub fn shape(&self) -> (usize, usize) {
        self.0.dim()
    }

    /// Converts to a nested row-major `Vec`, the ledger's JSON layout.
    pub fn to_nested(&self) -> Vec<Vec<i8>> {
        self.0.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// Rebuilds a matrix from the ledger's nested-array layout.
    ///
    /// Fails if the rows are ragged.
    pub fn from_nested(rows: Vec<Vec<i8>>) -> Result<Self, WatermarkError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(nrows * ncols);
        for row in &rows {
            if row.len() != ncols {
                return Err(WatermarkError::ShapeMismatch {
                    expected: ncols,
                    actual: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }
        let data = Array2::from_shape_vec((nrows, ncols), flat)
            .map_err(|e| WatermarkError::InvalidInput(e.to_string()))?;
        Ok(GroundTruth(data))
    }
}

/// Serializes an image to its canonical byte order: row-major over
/// `(height, width, channels)` as 8-bit samples.
///
/// This is the byte stream that is hashed and signed, so it must be
/// identical across implementations. Values are truncated toward zero
/// and saturated to `0..=255`.
pub fn image_to_bytes(image: &Image) -> Vec<u8> {
    image.iter().map(|&v| v as u8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn image_bytes_are_row_major_truncated() {
        let mut image = Image::zeros((1, 2, 2));
        image[[0, 0, 0]] = 1.9;
        image[[0, 0, 1]] = 2.0;
        image[[0, 1, 0]] = 300.0;
        image[[0, 1, 1]] = -4.0;

        // Truncation toward zero, saturation at the u8 bounds.
        assert_eq!(image_to_bytes(&image), vec![1, 2, 255, 0]);
    }

    #[test]
    fn digest_is_deterministic_and_content_sensitive() {
        let a = ImageDigest::compute(b"candidate");
        let b = ImageDigest::compute(b"candidate");
        let c = ImageDigest::compute(b"reference");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_hex().len(), 2 * DIGEST_LEN);
    }

    #[test]
    fn ground_truth_nested_roundtrip() {
        let gt = GroundTruth(arr2(&[[0i8, 1], [-1, 0], [1, -1]]));
        let nested = gt.to_nested();
        assert_eq!(nested, vec![vec![0, 1], vec![-1, 0], vec![1, -1]]);

        let back = GroundTruth::from_nested(nested).expect("well-formed rows");
        assert_eq!(back, gt);
    }

    #[test]
    fn ragged_nested_rows_are_rejected() {
        let rows = vec![vec![1i8, 0], vec![1]];
        assert!(GroundTruth::from_nested(rows).is_err());
    }
}
