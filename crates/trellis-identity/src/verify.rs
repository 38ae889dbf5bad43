//! Assertion signature verification.
//!
//! An assertion lists one or more `(domain, key_id)` signers. Trust rule:
//! every listed signature must verify against the key fetched from its
//! claimed domain. A single failing signature makes the whole assertion
//! untrusted — this is deliberately stricter than "any signer passes".

use tracing::debug;

use crate::{canonical::signing_payload, error::IdentityError, keys, types::ThreePidAssertion};

/// Retrieves a named verify key from a named identity server.
///
/// Seam between signature verification and the network, so verification can
/// run against in-memory keys in tests. [`crate::client::IdentityClient`]
/// is the production implementation.
#[allow(async_fn_in_trait)]
pub trait KeyFetcher {
    async fn fetch_key(&self, id_server: &str, key_id: &str) -> Result<Vec<u8>, IdentityError>;
}

/// Verify every signature an assertion claims to carry.
///
/// Returns `Ok(false)` when a signature fails to verify — distrust is a
/// semantic outcome, not an error. Key-fetch and key-decode failures are
/// errors: they are operational faults and say nothing about trust.
pub async fn verify_assertion<F: KeyFetcher>(
    assertion: &ThreePidAssertion,
    fetcher: &F,
) -> Result<bool, IdentityError> {
    let payload = signing_payload(assertion)?;

    for (domain, sigs) in &assertion.signatures {
        for (key_id, sig_b64) in sigs {
            let raw = fetcher.fetch_key(domain, key_id).await?;
            let key = keys::parse_verifying_key(&raw)?;
            if !keys::signature_checks_out(&key, sig_b64, &payload) {
                debug!("Signature by {} ({}) failed verification", domain, key_id);
                return Ok(false);
            }
        }
    }
    Ok(true)
}
