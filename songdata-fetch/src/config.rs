//! Run settings resolution for songdata-fetch
//!
//! Provider credentials resolve with ENV → TOML priority; everything else
//! comes from the TOML config with built-in defaults.

use crate::models::{default_denylist, default_feature_allow_list};
use crate::pipeline::DEFAULT_ARTISTS;
use crate::services::pacing::PacingPolicy;
use crate::services::spotify_client::SpotifyClientConfig;
use songdata_common::config::{OutputConfig, ProviderConfig, TomlConfig};
use songdata_common::{Error, Result};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the client-credentials id
pub const CLIENT_ID_ENV_VAR: &str = "SONGDATA_CLIENT_ID";

/// Environment variable holding the client-credentials secret
pub const CLIENT_SECRET_ENV_VAR: &str = "SONGDATA_CLIENT_SECRET";

/// Client-credentials pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

// Keep the secret out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Validate credential value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve provider credentials from environment and TOML
///
/// **Priority:** ENV → TOML. Both halves of the pair must come from the same
/// source.
pub fn resolve_credentials(provider: &ProviderConfig) -> Result<Credentials> {
    let env_pair = credential_pair(
        std::env::var(CLIENT_ID_ENV_VAR).ok(),
        std::env::var(CLIENT_SECRET_ENV_VAR).ok(),
    );
    let toml_pair = credential_pair(provider.client_id.clone(), provider.client_secret.clone());

    // Warn if multiple sources (potential misconfiguration)
    if env_pair.is_some() && toml_pair.is_some() {
        warn!("Provider credentials found in environment and TOML. Using environment (highest priority).");
    }

    if let Some(credentials) = env_pair {
        info!("Provider credentials loaded from environment variables");
        return Ok(credentials);
    }

    if let Some(credentials) = toml_pair {
        info!("Provider credentials loaded from TOML config");
        return Ok(credentials);
    }

    Err(Error::Config(format!(
        "Provider credentials not configured. Please configure using one of:\n\
         1. Environment: {}=your-id {}=your-secret\n\
         2. TOML config: [provider] client_id = \"...\", client_secret = \"...\"",
        CLIENT_ID_ENV_VAR, CLIENT_SECRET_ENV_VAR
    )))
}

fn credential_pair(id: Option<String>, secret: Option<String>) -> Option<Credentials> {
    match (id, secret) {
        (Some(id), Some(secret)) if is_valid_key(&id) && is_valid_key(&secret) => {
            Some(Credentials::new(id.trim(), secret.trim()))
        }
        _ => None,
    }
}

/// Everything a run needs, resolved from configuration
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub client: SpotifyClientConfig,
    pub pacing: PacingPolicy,
    pub artists: Vec<String>,
    pub features: Vec<String>,
    pub denylist: Vec<String>,
    pub output: OutputConfig,
}

impl RunSettings {
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        let credentials = resolve_credentials(&config.provider)?;

        Ok(Self {
            client: SpotifyClientConfig {
                credentials,
                api_base_url: config.provider.api_base_url.clone(),
                accounts_url: config.provider.accounts_url.clone(),
                market: config.provider.market.clone(),
                timeout: Duration::from_secs(config.provider.timeout_secs),
                requests_per_second: config.provider.requests_per_second,
            },
            pacing: PacingPolicy::from_config(&config.pacing),
            artists: resolve_artists(config)?,
            features: resolve_features(config)?,
            denylist: default_denylist(),
            output: config.output.clone(),
        })
    }
}

/// Configured artist list, or the built-in one
pub fn resolve_artists(config: &TomlConfig) -> Result<Vec<String>> {
    match &config.artists {
        Some(artists) => non_blank_names(artists, "artists"),
        None => Ok(DEFAULT_ARTISTS.iter().map(|s| s.to_string()).collect()),
    }
}

/// Configured feature allow-list, or the built-in one
pub fn resolve_features(config: &TomlConfig) -> Result<Vec<String>> {
    match &config.features {
        Some(features) => non_blank_names(features, "features"),
        None => Ok(default_feature_allow_list()),
    }
}

fn non_blank_names(names: &[String], key: &str) -> Result<Vec<String>> {
    if names.is_empty() {
        return Err(Error::InvalidInput(format!("'{}' must not be empty", key)));
    }
    names
        .iter()
        .map(|name| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                Err(Error::InvalidInput(format!("'{}' contains a blank entry", key)))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}
