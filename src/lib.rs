//! Zauth - Device-flow credential manager library
//!
//! This library provides the core functionality for the Zauth credential
//! manager: the OAuth 2.0 device authorization grant state machine, the
//! provider authentication service, and credential storage.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `device_flow`: Device-code initiation, token exchange, and outcome
//!   classification
//! - `service`: Blocking and single-step entry points over the shared
//!   exchange step, plus provider dispatch
//! - `storage`: Credential sink backed by the OS keyring
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use zauth::{AuthService, Config, KeyringStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml")?;
//!     config.validate()?;
//!
//!     let service = AuthService::new(&config, Arc::new(KeyringStore::new()))?;
//!     let session = service.initiate("github_copilot").await?;
//!     println!("Visit {} and enter {}", session.verification_uri, session.user_code);
//!
//!     let outcome = service.run_to_completion(&session).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod device_flow;
pub mod error;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use device_flow::{DeviceFlowClient, DeviceSession, LoginOutcome, PollOutcome};
pub use error::{Result, ZauthError};
pub use service::{AuthService, InitiateResponse, PollResponse, PollStatus};
pub use storage::{CredentialStore, KeyringStore, MemoryStore};
