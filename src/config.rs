//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// API base used when the settings store has no `apiBase` entry.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Number of outfits requested per generation.
pub const OUTFITS_COUNT: u32 = 3;

/// Where the SerpAPI credential for a deployment comes from.
///
/// A deployment picks exactly one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// The back end holds the key; the client always sends `null`.
    ServerSide,
    /// The client may send the key stored in its settings.
    ClientSupplied,
}

impl std::str::FromStr for CredentialMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "server" => Ok(Self::ServerSide),
            "client" => Ok(Self::ClientSupplied),
            other => Err(ConfigError::InvalidValue {
                key: "ANNA_CREDENTIAL_MODE".into(),
                message: format!("expected `server` or `client`, got `{other}`"),
            }),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON file backing the persisted settings.
    pub settings_path: PathBuf,
    /// Credential handling for this deployment.
    pub credential_mode: CredentialMode,
    /// Timeout applied to every outfit service request.
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            credential_mode: CredentialMode::ClientSupplied,
            request_timeout: Duration::from_secs(20),
        }
    }
}

impl AppConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings_path = std::env::var("ANNA_SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_settings_path());

        let credential_mode = match std::env::var("ANNA_CREDENTIAL_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => CredentialMode::ClientSupplied,
        };

        let timeout_secs: u64 = std::env::var("ANNA_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(20);

        Ok(Self {
            settings_path,
            credential_mode,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn default_settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".anna/settings.json")
}
