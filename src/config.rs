//! Configuration management for Zauth
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, ZauthError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Zauth
///
/// Holds provider selection and per-provider authentication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Provider configuration
///
/// Specifies which provider to authenticate against by default and the
/// settings for each supported provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Default provider for the `auth` command
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// GitHub device-flow configuration
    #[serde(default)]
    pub github: GithubAuthConfig,
}

fn default_provider_type() -> String {
    "github_copilot".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            github: GithubAuthConfig::default(),
        }
    }
}

/// GitHub device-flow configuration
///
/// The `client_id` is fixed configuration for the application, not runtime
/// state; modelling it here keeps the protocol core testable with injected
/// values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubAuthConfig {
    /// OAuth client id registered for the application
    #[serde(default = "default_github_client_id")]
    pub client_id: String,

    /// OAuth scope requested at initiation
    #[serde(default = "default_github_scope")]
    pub scope: String,

    /// Optional base URL override for the GitHub OAuth endpoints
    ///
    /// When set, this base is used to build the device-code and token
    /// endpoints, which allows tests to point the client at a mock server.
    #[serde(default)]
    pub api_base: Option<String>,
}

fn default_github_client_id() -> String {
    "Iv1.b507a3d201c00000".to_string()
}

fn default_github_scope() -> String {
    "read:user".to_string()
}

impl Default for GithubAuthConfig {
    fn default() -> Self {
        Self {
            client_id: default_github_client_id(),
            scope: default_github_scope(),
            api_base: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ZauthError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ZauthError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("ZAUTH_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(client_id) = std::env::var("ZAUTH_GITHUB_CLIENT_ID") {
            self.provider.github.client_id = client_id;
        }

        if let Ok(scope) = std::env::var("ZAUTH_GITHUB_SCOPE") {
            self.provider.github.scope = scope;
        }

        if let Ok(api_base) = std::env::var("ZAUTH_GITHUB_API_BASE") {
            tracing::debug!("Env override: ZAUTH_GITHUB_API_BASE");
            self.provider.github.api_base = Some(api_base);
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if required fields are empty
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(ZauthError::Config("provider.type must not be empty".to_string()).into());
        }

        if self.provider.github.client_id.is_empty() {
            return Err(
                ZauthError::Config("provider.github.client_id must not be empty".to_string())
                    .into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.provider_type, "github_copilot");
        assert_eq!(config.provider.github.client_id, "Iv1.b507a3d201c00000");
        assert_eq!(config.provider.github.scope, "read:user");
        assert!(config.provider.github.api_base.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "provider:\n  type: github_copilot\n  github:\n    client_id: test-client\n    scope: repo"
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.provider.github.client_id, "test-client");
        assert_eq!(config.provider.github.scope, "repo");
    }

    #[test]
    #[serial]
    fn test_load_partial_yaml_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider:\n  type: google").unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.provider.provider_type, "google");
        assert_eq!(config.provider.github.client_id, "Iv1.b507a3d201c00000");
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider: [not a map").unwrap();

        let result = Config::load(file.path().to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load("definitely/not/a/config.yaml").unwrap();
        assert_eq!(config.provider.provider_type, "github_copilot");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("ZAUTH_PROVIDER", "google");
        std::env::set_var("ZAUTH_GITHUB_CLIENT_ID", "Iv1.from-env");

        let config = Config::load("definitely/not/a/config.yaml").unwrap();
        assert_eq!(config.provider.provider_type, "google");
        assert_eq!(config.provider.github.client_id, "Iv1.from-env");

        std::env::remove_var("ZAUTH_PROVIDER");
        std::env::remove_var("ZAUTH_GITHUB_CLIENT_ID");
    }

    #[test]
    fn test_validate_empty_client_id_fails() {
        let mut config = Config::default();
        config.provider.github.client_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_provider_type_fails() {
        let mut config = Config::default();
        config.provider.provider_type = String::new();
        assert!(config.validate().is_err());
    }
}
