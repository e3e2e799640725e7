//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOCKROOM_API_URL` - Base URL of the inventory REST backend
//!
//! ## Optional
//! - `STOCKROOM_TOKEN` - Bearer token; takes precedence over the session file
//! - `STOCKROOM_SESSION_FILE` - Where `session login` stores the token (default: .stockroom-session)
//! - `STOCKROOM_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `STOCKROOM_COLOR_THRESHOLD` - Fuzzy color search threshold, 0.0-1.0 (default: 0.3)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use stockroom_core::search::DEFAULT_THRESHOLD;
use thiserror::Error;
use url::Url;

const DEFAULT_SESSION_FILE: &str = ".stockroom-session";
const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Stockroom client configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend
    pub api_url: Url,
    /// Bearer token supplied through the environment
    pub token: Option<SecretString>,
    /// Location of the persisted session token
    pub session_file: PathBuf,
    /// Per-request timeout
    pub timeout: Duration,
    /// Fuzzy search threshold for the color picker
    pub color_threshold: f64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("session_file", &self.session_file)
            .field("timeout", &self.timeout)
            .field("color_threshold", &self.color_threshold)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("STOCKROOM_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("STOCKROOM_API_URL".to_string()))?;
        let api_url = parse_api_url(&raw_url)?;

        let token = lookup("STOCKROOM_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        let session_file = session_file_from(&lookup);

        let timeout_secs = lookup("STOCKROOM_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOCKROOM_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let color_threshold = match lookup("STOCKROOM_COLOR_THRESHOLD") {
            Some(raw) => parse_threshold(&raw)?,
            None => DEFAULT_THRESHOLD,
        };

        Ok(Self {
            api_url,
            token,
            session_file,
            timeout: Duration::from_secs(timeout_secs),
            color_threshold,
        })
    }
}

/// Location of the session file, without requiring the rest of the configuration.
///
/// `session login` and `session logout` only touch this file.
#[must_use]
pub fn session_file_from_env() -> PathBuf {
    let _ = dotenvy::dotenv();
    session_file_from(&|key: &str| std::env::var(key).ok())
}

// =============================================================================
// Helper Functions
// =============================================================================

fn session_file_from<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    PathBuf::from(lookup("STOCKROOM_SESSION_FILE").unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string()))
}

/// Parse and check the backend base URL.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("STOCKROOM_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "STOCKROOM_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse a search threshold in `0.0..=1.0`.
fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    let invalid = |reason: String| {
        ConfigError::InvalidEnvVar("STOCKROOM_COLOR_THRESHOLD".to_string(), reason)
    };
    let value = raw.trim().parse::<f64>().map_err(|e| invalid(e.to_string()))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(format!("must be between 0 and 1 (got {value})")));
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("STOCKROOM_API_URL", "http://localhost:5000/api")]).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:5000/api");
        assert!(config.token.is_none());
        assert_eq!(config.session_file, PathBuf::from(".stockroom-session"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!((config.color_threshold - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_api_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "STOCKROOM_API_URL"));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = load(&[("STOCKROOM_API_URL", "ftp://example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
        assert!(load(&[("STOCKROOM_API_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_token_and_overrides() {
        let config = load(&[
            ("STOCKROOM_API_URL", "https://inventory.example.com"),
            ("STOCKROOM_TOKEN", "tok-123"),
            ("STOCKROOM_SESSION_FILE", "/tmp/session"),
            ("STOCKROOM_HTTP_TIMEOUT_SECS", "5"),
            ("STOCKROOM_COLOR_THRESHOLD", "0.5"),
        ])
        .unwrap();
        assert_eq!(config.token.as_ref().unwrap().expose_secret(), "tok-123");
        assert_eq!(config.session_file, PathBuf::from("/tmp/session"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!((config.color_threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = load(&[
            ("STOCKROOM_API_URL", "http://localhost"),
            ("STOCKROOM_TOKEN", "  "),
        ])
        .unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let err = load(&[
            ("STOCKROOM_API_URL", "http://localhost"),
            ("STOCKROOM_COLOR_THRESHOLD", "1.5"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = load(&[
            ("STOCKROOM_API_URL", "http://localhost"),
            ("STOCKROOM_TOKEN", "super_secret_bearer_token"),
        ])
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_bearer_token"));
    }
}
