//! Validated binding lookup — the query / validity / signature state machine.
//!
//! A lookup is only returned to the caller once it is both time-valid and
//! cryptographically trusted:
//!
//! 1. **Query** the identity server for the `(medium, address)` binding.
//! 2. **Validity**: the current time must lie within
//!    `[not_before, not_after]`. A stale window re-runs the whole query —
//!    a fresh query is expected to yield a fresh window — bounded by
//!    `max_lookup_attempts` so a misconfigured remote can't loop us forever.
//! 3. **Signatures**: every listed signer must verify. Distrust is terminal
//!    and never retried; staleness and distrust are different failure classes.

use tracing::warn;

use crate::{
    client::IdentityClient,
    error::IdentityError,
    types::ThreePidAssertion,
    verify::verify_assertion,
};

impl IdentityClient {
    /// Look up the current binding for `(medium, address)` on `id_server`,
    /// enforcing validity-window freshness and signature trust.
    ///
    /// An assertion with an empty `mxid` is a successful negative result:
    /// the address is not bound to anyone yet.
    pub async fn lookup(
        &self,
        medium: &str,
        address: &str,
        id_server: &str,
    ) -> Result<ThreePidAssertion, IdentityError> {
        let max_attempts = self.config().max_lookup_attempts.max(1);

        for attempt in 1..=max_attempts {
            let assertion = self.lookup_raw(medium, address, id_server).await?;

            if !assertion.is_valid_at(self.now_millis()) {
                warn!(
                    "Binding for {}:{} from '{}' is outside its validity window \
                     (attempt {}/{}), re-querying",
                    medium, address, id_server, attempt, max_attempts,
                );
                continue;
            }

            if !verify_assertion(&assertion, self).await? {
                return Err(IdentityError::UntrustedAssertion { server: id_server.to_owned() });
            }

            return Ok(assertion);
        }

        Err(IdentityError::StaleAssertion {
            server: id_server.to_owned(),
            attempts: max_attempts,
        })
    }
}
