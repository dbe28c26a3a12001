//! Configuration management.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults (serde defaults below)
//! 2. an optional TOML file (`./go-out-mcp.toml` or the platform config dir)
//! 3. environment variables: `GOOUT_TOKEN`, `GOOUT_BASE_URL`, and
//!    `GOOUT_<SECTION>__<KEY>` for everything else
//!
//! ```toml
//! [api]
//! base_url = "https://www.go-out.co/endOne"
//! timeout_secs = 30
//!
//! [defaults]
//! events_page_size = 5
//! events_limit = 20
//! participants_limit = 50
//! max_events_to_fetch = 200
//! salesman_scan_limit = 1000
//!
//! [shortener]
//! endpoint = "https://is.gd/create.php"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up by [`find_config_file`]
pub const CONFIG_FILE_NAME: &str = "go-out-mcp.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Upstream API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Tool argument defaults and fetch caps
    #[serde(default)]
    pub defaults: Defaults,

    /// URL shortener settings
    #[serde(default)]
    pub shortener: ShortenerConfig,
}

/// Go-Out API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token; never written out by [`Config::to_toml`]
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.go-out.co/endOne".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Tool defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Events returned per upstream page
    #[serde(default = "default_events_page_size")]
    pub events_page_size: usize,

    #[serde(default = "default_events_limit")]
    pub events_limit: usize,

    #[serde(default = "default_participants_limit")]
    pub participants_limit: usize,

    /// Hard cap on events scanned per `get_events` call
    #[serde(default = "default_max_events_to_fetch")]
    pub max_events_to_fetch: usize,

    /// Orders scanned when filtering by salesman
    #[serde(default = "default_salesman_scan_limit")]
    pub salesman_scan_limit: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            events_page_size: default_events_page_size(),
            events_limit: default_events_limit(),
            participants_limit: default_participants_limit(),
            max_events_to_fetch: default_max_events_to_fetch(),
            salesman_scan_limit: default_salesman_scan_limit(),
        }
    }
}

fn default_events_page_size() -> usize {
    5
}

fn default_events_limit() -> usize {
    20
}

fn default_participants_limit() -> usize {
    50
}

fn default_max_events_to_fetch() -> usize {
    200
}

fn default_salesman_scan_limit() -> usize {
    1000
}

/// URL shortener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortenerConfig {
    #[serde(default = "default_shortener_endpoint")]
    pub endpoint: String,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_shortener_endpoint(),
        }
    }
}

fn default_shortener_endpoint() -> String {
    crate::api::IS_GD_ENDPOINT.to_string()
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GOOUT_TOKEN environment variable is not set")]
    MissingToken,

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to render configuration: {0}")]
    Serialize(String),
}

impl Config {
    /// Fail unless a token is configured
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api.token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingToken),
        }
    }

    /// Render the effective configuration, without the token
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    build_config(path, true)
}

fn build_config(path: Option<&Path>, with_env: bool) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    if with_env {
        builder = builder
            .add_source(
                config::Environment::with_prefix("GOOUT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.token", std::env::var("GOOUT_TOKEN").ok())?
            .set_override_option("api.base_url", std::env::var("GOOUT_BASE_URL").ok())?;
    }

    let config: Config = builder.build()?.try_deserialize()?;
    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");
    Ok(config)
}

/// Locate a configuration file: `./go-out-mcp.toml`, then
/// `<config dir>/go-out-mcp/config.toml`
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("go-out-mcp").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://www.go-out.co/endOne");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.defaults.events_page_size, 5);
        assert_eq!(config.defaults.events_limit, 20);
        assert_eq!(config.defaults.participants_limit, 50);
        assert_eq!(config.defaults.max_events_to_fetch, 200);
        assert_eq!(config.defaults.salesman_scan_limit, 1000);
        assert_eq!(config.shortener.endpoint, "https://is.gd/create.php");
    }

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("go-out-mcp.toml");

        let toml_content = r#"
[api]
base_url = "http://localhost:9000/endOne"
token = "file-token"
timeout_secs = 5

[defaults]
participants_limit = 25
"#;

        let mut file = File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = build_config(Some(&path), false).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9000/endOne");
        assert_eq!(config.api.token.as_deref(), Some("file-token"));
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.defaults.participants_limit, 25);
        // Unset keys keep their defaults
        assert_eq!(config.defaults.events_page_size, 5);
        assert_eq!(config.shortener.endpoint, "https://is.gd/create.php");
    }

    #[test]
    fn test_config_file_nonexistent() {
        let path = PathBuf::from("/nonexistent/go-out-mcp.toml");
        assert!(build_config(Some(&path), false).is_err());
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(build_config(Some(&path), false).is_err());
    }

    #[test]
    fn test_environment_overrides_sections() {
        std::env::set_var("GOOUT_API__TIMEOUT_SECS", "7");
        std::env::set_var("GOOUT_DEFAULTS__SALESMAN_SCAN_LIMIT", "9");
        let config = load_config(None);
        std::env::remove_var("GOOUT_API__TIMEOUT_SECS");
        std::env::remove_var("GOOUT_DEFAULTS__SALESMAN_SCAN_LIMIT");

        let config = config.unwrap();
        assert_eq!(config.api.timeout_secs, 7);
        assert_eq!(config.defaults.salesman_scan_limit, 9);
        assert_eq!(config.defaults.events_limit, 20);
    }

    #[test]
    fn test_validate_requires_token() {
        let mut config = Config::default();
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "GOOUT_TOKEN environment variable is not set"
        );

        config.api.token = Some("   ".to_string());
        assert!(config.validate().is_err());

        config.api.token = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_toml_omits_token() {
        let mut config = Config::default();
        config.api.token = Some("secret".to_string());

        let rendered = config.to_toml().unwrap();
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[api]"));
        assert!(rendered.contains("events_page_size = 5"));

        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.defaults, config.defaults);
    }
}
