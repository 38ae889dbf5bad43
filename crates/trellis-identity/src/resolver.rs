//! 3PID invite resolution — deciding what a membership request targets.
//!
//! Runs once per membership request, before any member event is built. A
//! request either names a native target directly, or carries the 3PID triple
//! (`id_server`, `medium`, `address`) which must resolve through a trusted
//! identity-server lookup first.

use trellis_common::models::MembershipRequest;

use crate::{client::IdentityClient, error::IdentityError};

/// Outcome of resolving a membership request's 3PID fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No 3PID field was supplied — a standard invite; the caller proceeds
    /// with whatever native target the request already names.
    NotThreePid,
    /// The address is bound; invite this user ID directly.
    Bound(String),
    /// The lookup was valid and trusted but nobody owns the address yet.
    /// The caller decides what that means — typically a
    /// [`store_invite`](IdentityClient::store_invite) call and a pending
    /// invite event.
    Unbound,
}

impl IdentityClient {
    /// Resolve the 3PID fields of a membership request, if any.
    ///
    /// Performs no network I/O unless all three 3PID fields are present.
    pub async fn resolve_invite(
        &self,
        request: &MembershipRequest,
    ) -> Result<Resolution, IdentityError> {
        let Some((medium, address, id_server)) = three_pid_fields(request)? else {
            return Ok(Resolution::NotThreePid);
        };

        let assertion = self.lookup(medium, address, id_server).await?;
        if assertion.is_bound() {
            Ok(Resolution::Bound(assertion.mxid))
        } else {
            Ok(Resolution::Unbound)
        }
    }

    /// Like [`resolve_invite`](Self::resolve_invite), but on a bound result
    /// also fills in `request.user_id` so the membership pipeline can carry
    /// on as a direct invite.
    pub async fn resolve_target(
        &self,
        request: &mut MembershipRequest,
    ) -> Result<Resolution, IdentityError> {
        let resolution = self.resolve_invite(request).await?;
        if let Resolution::Bound(mxid) = &resolution {
            request.user_id = Some(mxid.clone());
        }
        Ok(resolution)
    }
}

/// Extract the 3PID triple, enforcing the all-or-none invariant.
///
/// Empty strings count as absent, matching what permissive clients send.
fn three_pid_fields(
    request: &MembershipRequest,
) -> Result<Option<(&str, &str, &str)>, IdentityError> {
    let medium = present(&request.medium);
    let address = present(&request.address);
    let id_server = present(&request.id_server);

    match (medium, address, id_server) {
        (None, None, None) => Ok(None),
        (Some(m), Some(a), Some(s)) => Ok(Some((m, a, s))),
        _ => Err(IdentityError::MalformedRequest),
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
