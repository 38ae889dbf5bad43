//! Ed25519 primitives for verifying identity-server signatures.
//!
//! Identity servers publish their verify keys at
//! `/_matrix/identity/api/v1/pubkey/{keyId}` as unpadded standard base64.
//! Key IDs follow the Matrix convention `ed25519:<fingerprint>`.

use base64::Engine as _;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::error::IdentityError;

/// Decode an unpadded-base64 public key into raw bytes.
pub fn decode_public_key(b64: &str) -> Result<Vec<u8>, IdentityError> {
    base64::engine::general_purpose::STANDARD_NO_PAD
        .decode(b64)
        .map_err(|e| IdentityError::Decode(format!("invalid base64 public key: {e}")))
}

/// Parse raw fetched key bytes into a verifying key.
///
/// A key that cannot be parsed is an operational fault of the fetched
/// material, not an untrusted-signature outcome.
pub(crate) fn parse_verifying_key(raw: &[u8]) -> Result<VerifyingKey, IdentityError> {
    let bytes: [u8; 32] = raw
        .try_into()
        .map_err(|_| IdentityError::Decode("public key must be exactly 32 bytes".into()))?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| IdentityError::Decode(format!("invalid Ed25519 public key: {e}")))
}

/// Check a single unpadded-base64 signature over `message`.
///
/// A malformed or mismatched signature is an untrusted outcome (`false`),
/// never an error.
pub(crate) fn signature_checks_out(key: &VerifyingKey, sig_b64: &str, message: &[u8]) -> bool {
    let Ok(sig_bytes) = base64::engine::general_purpose::STANDARD_NO_PAD.decode(sig_b64) else {
        return false;
    };
    let Ok(sig_array) = <[u8; 64]>::try_from(sig_bytes.as_slice()) else {
        return false;
    };
    let signature = Signature::from_bytes(&sig_array);
    key.verify(message, &signature).is_ok()
}
