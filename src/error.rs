//! Error types for Zauth
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Zauth operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, device-flow initiation, provider interactions,
/// and credential storage.
#[derive(Error, Debug)]
pub enum ZauthError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Device-code initiation failed (malformed response or transport failure)
    #[error("Initiation error: {0}")]
    Initiation(String),

    /// Provider-related errors (unsupported provider, protocol violations)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Authentication errors (denied, expired, timed out)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Credential storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type alias for Zauth operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
