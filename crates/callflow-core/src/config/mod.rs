//! Configuration for the fetch collaborator.
//!
//! The engine itself never reads ambient state; everything the fetch
//! side needs (which PBX domain, which API server, which servers an
//! operator may point it at) arrives through an explicit [`Config`].
//!
//! Configuration is loaded from multiple sources with the following
//! priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `callflow.toml` file
//! 3. User config `~/.config/callflow/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use url::Url;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provisioning API settings for the fetch collaborator.
    pub api: ApiConfig,
}

/// Settings handed to the fetch collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the provisioning API.
    pub base_url: Option<String>,
    /// PBX domain whose topology should be fetched.
    pub domain: Option<String>,
    /// Hostname patterns an operator-supplied API URL may resolve to.
    /// Exact hostnames, `*` (allow everything), or `*.suffix`
    /// wildcards.
    pub allowed_hosts: Vec<String>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./callflow.toml` (project local)
    /// 2. `~/.config/callflow/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(ENV_API_URL) {
            self.api.base_url = Some(base_url);
        }
        if let Ok(domain) = std::env::var(ENV_DOMAIN) {
            self.api.domain = Some(domain);
        }
        if let Ok(hosts) = std::env::var(ENV_ALLOWED_HOSTS) {
            self.api.allowed_hosts.extend(
                hosts
                    .split(',')
                    .map(str::trim)
                    .filter(|pattern| !pattern.is_empty())
                    .map(String::from),
            );
        }
    }
}

impl ApiConfig {
    /// Whether an operator-supplied API URL points at an allowed host.
    ///
    /// URLs without a scheme are treated as https. Unparseable URLs
    /// and URLs without a hostname are denied.
    pub fn host_allowed(&self, raw_url: &str) -> bool {
        let raw_url = raw_url.trim();
        if raw_url.is_empty() {
            return false;
        }

        let candidate = if raw_url.contains("://") {
            raw_url.to_string()
        } else {
            format!("https://{raw_url}")
        };

        let Ok(parsed) = Url::parse(&candidate) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };

        self.allowed_hosts
            .iter()
            .any(|pattern| host_matches(pattern, host))
    }

    /// Normalizes a base URL: trims whitespace, strips trailing
    /// slashes, and prepends https when no scheme is given.
    pub fn normalize_base_url(raw: &str) -> String {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() || trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        }
    }
}

fn host_matches(pattern: &str, host: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if let Some(suffix) = pattern.strip_prefix("*.") {
        let host = host.to_ascii_lowercase();
        let suffix = suffix.to_ascii_lowercase();
        return host == suffix || host.ends_with(&format!(".{suffix}"));
    }
    pattern.eq_ignore_ascii_case(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api.base_url.is_none());
        assert!(config.api.allowed_hosts.is_empty());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[api]
base_url = "https://pbx.example.com"
domain = "acme.example"
allowed_hosts = ["pbx.example.com", "*.example.net"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.api.base_url.as_deref(),
            Some("https://pbx.example.com")
        );
        assert_eq!(config.api.domain.as_deref(), Some("acme.example"));
        assert_eq!(config.api.allowed_hosts.len(), 2);
    }

    #[test]
    fn test_host_allowed_exact_and_wildcard() {
        let api = ApiConfig {
            allowed_hosts: vec!["pbx.example.com".into(), "*.example.net".into()],
            ..Default::default()
        };
        assert!(api.host_allowed("https://pbx.example.com/ns-api/v2"));
        assert!(api.host_allowed("pbx.example.com"));
        assert!(api.host_allowed("https://core1.example.net"));
        assert!(api.host_allowed("example.net"));
        assert!(!api.host_allowed("https://evil.example.org"));
        assert!(!api.host_allowed("notexample.net"));
        assert!(!api.host_allowed(""));
    }

    #[test]
    fn test_host_allowed_denies_everything_by_default() {
        let api = ApiConfig::default();
        assert!(!api.host_allowed("https://pbx.example.com"));
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            ApiConfig::normalize_base_url("pbx.example.com/"),
            "https://pbx.example.com"
        );
        assert_eq!(
            ApiConfig::normalize_base_url("https://pbx.example.com//"),
            "https://pbx.example.com"
        );
    }
}
