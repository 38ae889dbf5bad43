//! Identity-server HTTP client.
//!
//! The [`IdentityClient`] owns all outbound communication with identity
//! servers: binding lookups, public key fetches, and the store-invite call
//! used when an address is not yet bound. Connection pooling comes from the
//! shared `reqwest` client; no other state is shared between resolutions.
//!
//! # Usage
//!
//! ```rust,no_run
//! use trellis_common::config::IdentityConfig;
//! use trellis_identity::client::IdentityClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = IdentityClient::new(IdentityConfig::default());
//!     let assertion = client.lookup("email", "alice@example.org", "id.example.com").await.unwrap();
//!     println!("bound to: {}", assertion.mxid);
//! }
//! ```

use std::{sync::Arc, time::Duration};

use tracing::debug;
use trellis_common::config::IdentityConfig;

use crate::{
    cache::KeyCache,
    clock::{Clock, SystemClock},
    error::IdentityError,
    keys,
    types::{PubkeyResponse, ThreePidAssertion},
    verify::KeyFetcher,
};

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async HTTP client for identity-server requests.
pub struct IdentityClient {
    http: reqwest::Client,
    config: IdentityConfig,
    clock: Arc<dyn Clock>,
    key_cache: Option<KeyCache>,
}

impl IdentityClient {
    /// Create a client that reads time from the system clock.
    pub fn new(config: IdentityConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a client with an injected clock (used by tests to control the
    /// validity-window check).
    pub fn with_clock(config: IdentityConfig, clock: Arc<dyn Clock>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("Trellis-Identity/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build reqwest client");

        let key_cache = (config.key_cache_ttl_secs > 0)
            .then(|| KeyCache::new(Duration::from_secs(config.key_cache_ttl_secs)));

        Self { http, config, clock, key_cache }
    }

    pub(crate) fn config(&self) -> &IdentityConfig {
        &self.config
    }

    pub(crate) fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    // ── Binding lookup (raw) ─────────────────────────────────────────────────

    /// Issue one lookup query, with no validity or signature checking.
    ///
    /// `GET /_matrix/identity/api/v1/lookup?medium=&address=`
    pub(crate) async fn lookup_raw(
        &self,
        medium: &str,
        address: &str,
        id_server: &str,
    ) -> Result<ThreePidAssertion, IdentityError> {
        let url = format!(
            "{}/_matrix/identity/api/v1/lookup?medium={}&address={}",
            base_url(id_server),
            urlencoded(medium),
            urlencoded(address),
        );
        debug!("Identity lookup GET {}", url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| IdentityError::Network {
                server: id_server.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(resp.json().await?)
    }

    // ── Public key fetching ──────────────────────────────────────────────────

    /// Fetch a named verify key from an identity server and decode it.
    ///
    /// `GET /_matrix/identity/api/v1/pubkey/{keyId}`
    pub async fn fetch_pubkey(
        &self,
        id_server: &str,
        key_id: &str,
    ) -> Result<Vec<u8>, IdentityError> {
        if let Some(cache) = &self.key_cache {
            if let Some(raw) = cache.get(id_server, key_id).await {
                return Ok(raw);
            }
        }

        let url = format!("{}/_matrix/identity/api/v1/pubkey/{}", base_url(id_server), key_id);
        debug!("Identity pubkey GET {}", url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| IdentityError::Network {
                server: id_server.to_owned(),
                reason: e.to_string(),
            })?;
        let body: PubkeyResponse = resp.json().await?;
        let raw = keys::decode_public_key(&body.public_key)?;

        if let Some(cache) = &self.key_cache {
            cache.insert(id_server, key_id, raw.clone()).await;
        }
        Ok(raw)
    }

    // ── Store-invite hook ────────────────────────────────────────────────────

    /// Ask the identity server to hold an invite for an unbound address.
    ///
    /// `POST /_matrix/identity/api/v1/store-invite`, form-encoded. This is an
    /// explicit hook for the [`Resolution::Unbound`](crate::Resolution::Unbound)
    /// outcome — the resolver never calls it on its own.
    pub async fn store_invite(
        &self,
        medium: &str,
        address: &str,
        room_id: &str,
        sender: &str,
        id_server: &str,
    ) -> Result<(), IdentityError> {
        let url = format!("{}/_matrix/identity/api/v1/store-invite", base_url(id_server));
        let form = [
            ("medium", medium),
            ("address", address),
            ("room_id", room_id),
            ("sender", sender),
        ];
        debug!("Identity store-invite POST {}", url);
        self.http
            .post(&url)
            .form(&form)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| IdentityError::Network {
                server: id_server.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

impl KeyFetcher for IdentityClient {
    async fn fetch_key(&self, id_server: &str, key_id: &str) -> Result<Vec<u8>, IdentityError> {
        self.fetch_pubkey(id_server, key_id).await
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Identity servers are addressed by bare domain (optionally with port) and
/// reached over HTTPS. An explicit scheme is passed through untouched.
fn base_url(id_server: &str) -> String {
    if id_server.contains("://") {
        id_server.trim_end_matches('/').to_owned()
    } else {
        format!("https://{}", id_server)
    }
}

fn urlencoded(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn base_url_defaults_to_https() {
        assert_eq!(base_url("id.example.com"), "https://id.example.com");
        assert_eq!(base_url("id.example.com:8090"), "https://id.example.com:8090");
        assert_eq!(base_url("http://127.0.0.1:4000/"), "http://127.0.0.1:4000");
    }

    #[tokio::test]
    async fn fetch_pubkey_decodes_base64() {
        let server = MockServer::start().await;
        let signer = testutil::test_signing_key();
        Mock::given(method("GET"))
            .and(path("/_matrix/identity/api/v1/pubkey/ed25519:0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"public_key": testutil::pubkey_b64(&signer)})),
            )
            .mount(&server)
            .await;

        let client = IdentityClient::new(IdentityConfig::default());
        let raw = client.fetch_pubkey(&server.uri(), "ed25519:0").await.unwrap();
        assert_eq!(raw, signer.verifying_key().as_bytes().to_vec());
    }

    #[tokio::test]
    async fn fetch_pubkey_rejects_malformed_base64() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/_matrix/identity/api/v1/pubkey/ed25519:0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"public_key": "@@@"})))
            .mount(&server)
            .await;

        let client = IdentityClient::new(IdentityConfig::default());
        let err = client.fetch_pubkey(&server.uri(), "ed25519:0").await.unwrap_err();
        assert!(matches!(err, IdentityError::Decode(_)));
    }

    #[tokio::test]
    async fn fetch_pubkey_maps_http_failure_to_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/_matrix/identity/api/v1/pubkey/ed25519:0"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = IdentityClient::new(IdentityConfig::default());
        let err = client.fetch_pubkey(&server.uri(), "ed25519:0").await.unwrap_err();
        assert!(matches!(err, IdentityError::Network { .. }));
    }

    #[tokio::test]
    async fn enabled_cache_skips_the_second_fetch() {
        let server = MockServer::start().await;
        let signer = testutil::test_signing_key();
        Mock::given(method("GET"))
            .and(path("/_matrix/identity/api/v1/pubkey/ed25519:0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"public_key": testutil::pubkey_b64(&signer)})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = IdentityConfig { key_cache_ttl_secs: 60, ..Default::default() };
        let client = IdentityClient::new(config);
        let first = client.fetch_pubkey(&server.uri(), "ed25519:0").await.unwrap();
        let second = client.fetch_pubkey(&server.uri(), "ed25519:0").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn store_invite_posts_the_form_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/_matrix/identity/api/v1/store-invite"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("medium=email"))
            .and(body_string_contains("address=alice%40example.org"))
            .and(body_string_contains("room_id=%21room%3Atrellis.example.com"))
            .and(body_string_contains("sender=%40bob%3Atrellis.example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = IdentityClient::new(IdentityConfig::default());
        client
            .store_invite(
                "email",
                "alice@example.org",
                "!room:trellis.example.com",
                "@bob:trellis.example.com",
                &server.uri(),
            )
            .await
            .unwrap();
    }
}
