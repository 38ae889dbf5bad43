//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults

use serde::Deserialize;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Get the global application configuration.
///
/// # Panics
/// Panics if config has not been initialized via [`init`].
pub fn get() -> &'static AppConfig {
    CONFIG.get().expect("Config not initialized. Call trellis_common::config::init() first.")
}

/// Initialize the global configuration from environment.
///
/// Should be called once at application startup, before any other code accesses config.
pub fn init() -> Result<&'static AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let cfg = config::Config::builder()
        // Defaults
        .set_default("server.name", "localhost")?
        .set_default("identity.request_timeout_secs", 30)?
        .set_default("identity.max_lookup_attempts", 3)?
        .set_default("identity.key_cache_ttl_secs", 0)?
        // Optional config file
        .add_source(config::File::with_name("config").required(false))
        // Environment variables (TRELLIS_SERVER__NAME, TRELLIS_IDENTITY__MAX_LOOKUP_ATTEMPTS, etc.)
        .add_source(
            config::Environment::with_prefix("TRELLIS")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = cfg.try_deserialize()?;
    Ok(CONFIG.get_or_init(|| app_config))
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Public server name of this homeserver (e.g. "trellis.example.com").
    /// Maps to the `TRELLIS__SERVER__NAME` env var or `server.name` in config.toml.
    pub name: String,
}

/// Tunables for the identity-server client.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentityConfig {
    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
    /// How many times a binding lookup is attempted when the identity server
    /// keeps returning assertions outside their validity window.
    pub max_lookup_attempts: u32,
    /// TTL for the fetched-public-key cache, in seconds. `0` disables caching,
    /// so every verification re-fetches its keys.
    pub key_cache_ttl_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_lookup_attempts: 3,
            key_cache_ttl_secs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_defaults_disable_caching() {
        let cfg = IdentityConfig::default();
        assert_eq!(cfg.key_cache_ttl_secs, 0);
        assert_eq!(cfg.max_lookup_attempts, 3);
    }
}
