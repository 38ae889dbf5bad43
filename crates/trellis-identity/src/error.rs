//! Identity-layer error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while resolving a 3PID invite.
#[derive(Debug, Error)]
pub enum IdentityError {
    // ── Request validation ──────────────────────────────────────────────────

    #[error("'address', 'id_server' and 'medium' must all be supplied")]
    MalformedRequest,

    // ── Remote communication ────────────────────────────────────────────────

    #[error("HTTP error communicating with identity server '{server}': {reason}")]
    Network { server: String, reason: String },

    #[error("Malformed response from identity server: {0}")]
    Decode(String),

    // ── Trust decisions ─────────────────────────────────────────────────────

    #[error("The identity of server '{server}' could not be verified")]
    UntrustedAssertion { server: String },

    #[error("Identity server '{server}' kept returning out-of-window bindings ({attempts} attempts)")]
    StaleAssertion { server: String, attempts: u32 },

    // ── General ─────────────────────────────────────────────────────────────

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for IdentityError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return IdentityError::Decode(e.to_string());
        }
        let server = e.url().map(|u| u.host_str().unwrap_or("?").to_owned()).unwrap_or_default();
        IdentityError::Network { server, reason: e.to_string() }
    }
}

impl IdentityError {
    /// Map error to the HTTP status code a caller should surface.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedRequest => StatusCode::BAD_REQUEST,
            Self::Network { .. } | Self::Decode(_) => StatusCode::BAD_GATEWAY,
            Self::UntrustedAssertion { .. } => StatusCode::FORBIDDEN,
            Self::StaleAssertion { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Serialisation(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code string for programmatic handling by clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedRequest => "BAD_JSON",
            Self::Network { .. } => "IDENTITY_SERVER_UNREACHABLE",
            Self::Decode(_) => "IDENTITY_SERVER_BAD_RESPONSE",
            Self::UntrustedAssertion { .. } => "IDENTITY_SERVER_UNTRUSTED",
            Self::StaleAssertion { .. } => "IDENTITY_SERVER_STALE",
            Self::Serialisation(_) => "SERIALISATION_ERROR",
            Self::Other(_) => "INTERNAL_ERROR",
        }
    }
}
