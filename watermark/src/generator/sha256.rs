//! SHA-256 + RSA watermark generator.

use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use sha2::Sha256;

use crate::error::WatermarkError;
use crate::generator::WatermarkGenerator;
use crate::keys::{parse_private_key, parse_public_key};
use crate::types::{Image, PrivateKeyDer, PublicKeyDer, WatermarkBits, image_to_bytes};

/// Watermark generator backed by an RSA PKCS#1 v1.5 signature over the
/// SHA-256 hash of the image bytes.
///
/// The signature is deterministic, so the derived bit sequence is a pure
/// function of `(image, private_key)`; its length is bounded by the
/// signature size (2048 bits for a 2048-bit key).
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256RsaGenerator;

impl Sha256RsaGenerator {
    /// Signs the canonical image bytes, returning the raw signature.
    fn sign(&self, image: &Image, private_key: &PrivateKeyDer) -> Result<Vec<u8>, WatermarkError> {
        let key = parse_private_key(private_key)?;
        let signing_key = SigningKey::<Sha256>::new(key);

        let signature = signing_key
            .try_sign(&image_to_bytes(image))
            .map_err(|e| WatermarkError::InvalidKey(format!("signing failed: {e}")))?;
        Ok(signature.to_vec())
    }
}

impl WatermarkGenerator for Sha256RsaGenerator {
    fn generate(
        &self,
        image: &Image,
        private_key: &PrivateKeyDer,
        length: usize,
    ) -> Result<WatermarkBits, WatermarkError> {
        let signature = self.sign(image, private_key)?;

        let available = signature.len() * 8;
        if length > available {
            return Err(WatermarkError::WatermarkTooLong {
                requested: length,
                available,
            });
        }

        // Big-endian bit expansion, first `length` bits, 1 -> +1, 0 -> -1.
        let symbols = (0..length)
            .map(|bit| {
                let byte = signature[bit / 8];
                if (byte >> (7 - bit % 8)) & 1 == 1 { 1 } else { -1 }
            })
            .collect();

        Ok(WatermarkBits(symbols))
    }

    fn verify_signature(
        &self,
        image: &Image,
        private_key: &PrivateKeyDer,
        public_key: &PublicKeyDer,
    ) -> Result<bool, WatermarkError> {
        let signature_bytes = self.sign(image, private_key)?;
        let verifying_key = VerifyingKey::<Sha256>::new(parse_public_key(public_key)?);

        let Ok(signature) = Signature::try_from(signature_bytes.as_slice()) else {
            return Ok(false);
        };
        Ok(verifying_key
            .verify(&image_to_bytes(image), &signature)
            .is_ok())
    }
}
