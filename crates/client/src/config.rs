//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LENDSTOCK_API_URL` - Base URL of the inventory backend, including any
//!   path prefix (e.g., `https://inventory.example.com/api`)
//!
//! ## Optional
//! - `LENDSTOCK_API_TOKEN` - Bearer token sent with every request
//! - `LENDSTOCK_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Inventory backend connection settings.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Bearer token (optional; the backend may run without auth locally)
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Configuration for `base_url` with no token and the default timeout.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `LENDSTOCK_API_URL` is missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = get_required_env(&lookup, "LENDSTOCK_API_URL")?;
        let base_url = parse_base_url(&raw_url)?;

        let timeout_secs = get_env_or_default(&lookup, "LENDSTOCK_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LENDSTOCK_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let token = lookup("LENDSTOCK_API_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .map(|token| {
                if let Err(e) = validate_token(&token, "LENDSTOCK_API_TOKEN") {
                    tracing::warn!("LENDSTOCK_API_TOKEN validation warning: {e}");
                }
                SecretString::from(token)
            });

        Ok(Self {
            base_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(lookup: impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse the backend base URL, accepting only http(s).
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("LENDSTOCK_API_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "LENDSTOCK_API_URL".to_string(),
            format!("unsupported scheme: {}", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            "LENDSTOCK_API_URL".to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }

    Ok(url)
}

/// Reject tokens that look like copied placeholders.
fn validate_token(token: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = token.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InvalidEnvVar(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_minimal_config() {
        let config = ApiConfig::from_lookup(lookup(&[(
            "LENDSTOCK_API_URL",
            "https://inventory.test/api",
        )]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://inventory.test/api");
        assert!(config.token.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_full_config() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("LENDSTOCK_API_URL", "http://localhost:8080/api"),
            ("LENDSTOCK_API_TOKEN", "eyJhbGciOiJIUzI1NiJ9.abc.def"),
            ("LENDSTOCK_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(
            config.token.as_ref().unwrap().expose_secret(),
            "eyJhbGciOiJIUzI1NiJ9.abc.def"
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_url() {
        let err = ApiConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "LENDSTOCK_API_URL"));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = ApiConfig::from_lookup(lookup(&[("LENDSTOCK_API_URL", "ftp://inventory.test")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }

    #[test]
    fn test_rejects_bad_timeout() {
        let err = ApiConfig::from_lookup(lookup(&[
            ("LENDSTOCK_API_URL", "https://inventory.test/api"),
            ("LENDSTOCK_HTTP_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "LENDSTOCK_HTTP_TIMEOUT_SECS"));
    }

    #[test]
    fn test_placeholder_token_detected() {
        assert!(validate_token("your-token-here", "LENDSTOCK_API_TOKEN").is_err());
        assert!(validate_token("k8Fq2LmZ0pXv", "LENDSTOCK_API_TOKEN").is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ApiConfig::new(Url::parse("https://inventory.test/api").unwrap())
            .with_token(SecretString::from("k8Fq2LmZ0pXv"));
        let debug = format!("{config:?}");
        assert!(!debug.contains("k8Fq2LmZ0pXv"));
        assert!(debug.contains("[REDACTED]"));
    }
}
