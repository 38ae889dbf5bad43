//! Wire types for the identity-server v1 API.
//!
//! These follow the Matrix identity-service lookup response shape. Signature
//! maps use `BTreeMap` so the canonical serialisation never depends on map
//! iteration order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ─── Lookup response ─────────────────────────────────────────────────────────

/// A signed identity-server assertion that `(medium, address)` is currently
/// bound to `mxid`.
///
/// An empty `mxid` is a valid negative result: the address is not bound to
/// anyone yet. The assertion is only usable while the current time lies
/// within `[not_before, not_after]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreePidAssertion {
    /// Unix millisecond timestamp at which the assertion was issued.
    pub ts: i64,
    /// Start of the validity window (Unix ms, inclusive).
    pub not_before: i64,
    /// End of the validity window (Unix ms, inclusive).
    pub not_after: i64,
    /// 3PID medium, e.g. `email` or `msisdn`.
    pub medium: String,
    /// 3PID address; interpretation depends on `medium`.
    pub address: String,
    /// Bound native user ID, or empty if the address is unbound.
    #[serde(default)]
    pub mxid: String,
    /// Ed25519 signatures: signing domain → key ID → unpadded-base64 signature.
    #[serde(default)]
    pub signatures: BTreeMap<String, BTreeMap<String, String>>,
}

impl ThreePidAssertion {
    /// Whether the address resolved to a native user ID.
    pub fn is_bound(&self) -> bool {
        !self.mxid.is_empty()
    }

    /// Whether `now_ms` falls within the assertion's validity window.
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        self.not_before <= now_ms && now_ms <= self.not_after
    }
}

// ─── Key publication ─────────────────────────────────────────────────────────

/// Response shape of `GET /_matrix/identity/api/v1/pubkey/{keyId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubkeyResponse {
    /// Unpadded-base64 Ed25519 public key bytes.
    pub public_key: String,
}
