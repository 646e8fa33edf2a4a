//! RSA key-pair generation and DER parsing.
//!
//! Key material crosses the API as opaque DER blobs: private keys are
//! exported as PKCS#8, public keys as SPKI. Parsing accepts those
//! encodings first and falls back to the bare PKCS#1 forms, so keys
//! produced by other toolchains interoperate.

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::WatermarkError;
use crate::types::{PrivateKeyDer, PublicKeyDer};

/// Default RSA modulus size in bits.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Creates a new RSA key pair of the given modulus size.
///
/// Larger sizes give more signature bits (and thus longer watermarks) at
/// the cost of slower signing.
pub fn generate_keys(bits: usize) -> Result<(PrivateKeyDer, PublicKeyDer), WatermarkError> {
    let mut rng = rand::thread_rng();
    let private = RsaPrivateKey::new(&mut rng, bits)
        .map_err(|e| WatermarkError::InvalidKey(format!("key generation failed: {e}")))?;
    let public = RsaPublicKey::from(&private);

    let private_der = private
        .to_pkcs8_der()
        .map_err(|e| WatermarkError::InvalidKey(format!("private key export failed: {e}")))?
        .as_bytes()
        .to_vec();
    let public_der = public
        .to_public_key_der()
        .map_err(|e| WatermarkError::InvalidKey(format!("public key export failed: {e}")))?
        .into_vec();

    Ok((PrivateKeyDer(private_der), PublicKeyDer(public_der)))
}

/// Parses a DER-encoded private key (PKCS#8, then PKCS#1).
pub(crate) fn parse_private_key(der: &PrivateKeyDer) -> Result<RsaPrivateKey, WatermarkError> {
    RsaPrivateKey::from_pkcs8_der(der.as_bytes())
        .or_else(|_| RsaPrivateKey::from_pkcs1_der(der.as_bytes()))
        .map_err(|e| WatermarkError::InvalidKey(format!("unparseable private key: {e}")))
}

/// Parses a DER-encoded public key (SPKI, then PKCS#1).
pub(crate) fn parse_public_key(der: &PublicKeyDer) -> Result<RsaPublicKey, WatermarkError> {
    RsaPublicKey::from_public_key_der(der.as_bytes())
        .or_else(|_| RsaPublicKey::from_pkcs1_der(der.as_bytes()))
        .map_err(|e| WatermarkError::InvalidKey(format!("unparseable public key: {e}")))
}
