//! Shared test fixtures: signing keys and pre-signed assertions.

use base64::Engine as _;
use ed25519_dalek::{Signer as _, SigningKey};
use rand_core::OsRng;

use crate::canonical::signing_payload;
use crate::types::ThreePidAssertion;

pub(crate) fn test_signing_key() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

pub(crate) fn pubkey_b64(key: &SigningKey) -> String {
    base64::engine::general_purpose::STANDARD_NO_PAD.encode(key.verifying_key().as_bytes())
}

pub(crate) fn assertion(mxid: &str, not_before: i64, not_after: i64) -> ThreePidAssertion {
    ThreePidAssertion {
        ts: not_before,
        not_before,
        not_after,
        medium: "email".into(),
        address: "alice@example.org".into(),
        mxid: mxid.into(),
        signatures: Default::default(),
    }
}

/// Sign `assertion` as `domain` would and attach the signature.
///
/// The signed payload excludes the `signatures` object, so signers can be
/// attached in any order.
pub(crate) fn sign(
    assertion: &mut ThreePidAssertion,
    domain: &str,
    key_id: &str,
    key: &SigningKey,
) {
    let payload = signing_payload(assertion).expect("assertion serialises");
    let sig = key.sign(&payload);
    let sig_b64 = base64::engine::general_purpose::STANDARD_NO_PAD.encode(sig.to_bytes());
    assertion
        .signatures
        .entry(domain.to_owned())
        .or_default()
        .insert(key_id.to_owned(), sig_b64);
}
