//! Command-line interface definition for Zauth
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for provider authentication and credential status.

use clap::{Parser, Subcommand};

/// Zauth - Device-flow credential manager CLI
///
/// Authenticate against AI providers using the OAuth device authorization
/// grant and store the resulting credentials in the system keyring.
#[derive(Parser, Debug, Clone)]
#[command(name = "zauth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Zauth
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Authenticate with a provider
    Auth {
        /// Provider to authenticate with (github_copilot, google)
        ///
        /// Use `--provider <name>` to override; if omitted the configured/default
        /// provider will be used.
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Show whether a credential is stored for a provider
    Status {
        /// Provider to inspect (github_copilot, google)
        #[arg(short, long)]
        provider: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Auth {
                provider: Some("github_copilot".to_string()),
            },
        }
    }
}
