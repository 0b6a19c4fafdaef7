//! Provider authentication service
//!
//! [`AuthService`] is the seam between the device-flow protocol core and
//! its two kinds of callers:
//!
//! - the CLI, which may block for the whole session lifetime and uses
//!   [`AuthService::run_to_completion`], and
//! - a request-dispatch layer, which must never block and drives the flow
//!   one poll at a time through [`AuthService::poll_once`].
//!
//! Both paths share [`DeviceFlowClient::poll_once`] for response
//! classification, so provider-response semantics cannot diverge between
//! them. The service owns the credential sink and performs the single
//! `Success` write for whichever path reaches it.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::time::Duration;

use crate::config::Config;
use crate::device_flow::{DeviceFlowClient, DeviceSession, LoginOutcome, PollOutcome};
use crate::error::{Result, ZauthError};
use crate::storage::CredentialStore;

/// Provider id for the GitHub Copilot device flow
pub const GITHUB_COPILOT_PROVIDER: &str = "github_copilot";

/// Provider id for Google application-default credentials
pub const GOOGLE_PROVIDER: &str = "google";

/// Credential key under which the GitHub token is stored
pub const GITHUB_TOKEN_KEY: &str = "GITHUB_COPILOT_TOKEN";

/// Session info returned to a request-dispatch layer after initiation
///
/// The `device_code` is included so the caller can hand it back on
/// subsequent `poll_once` calls; it must not be written to logs.
#[derive(Debug, Clone, Serialize)]
pub struct InitiateResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub interval: u64,
    pub expires_in: u64,
}

impl From<&DeviceSession> for InitiateResponse {
    fn from(session: &DeviceSession) -> Self {
        Self {
            device_code: session.device_code.clone(),
            user_code: session.user_code.clone(),
            verification_uri: session.verification_uri.clone(),
            interval: session.interval,
            expires_in: session.expires_in,
        }
    }
}

/// Outcome tag of a single-step poll, for frontend rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
    Authorized,
    Pending,
    SlowDown,
    Expired,
    Denied,
    TransportError,
    ProviderError,
}

/// Single-step poll result returned to a request-dispatch layer
#[derive(Debug, Clone, Serialize)]
pub struct PollResponse {
    pub status: PollStatus,
    pub message: String,
    /// Whether the caller should keep driving the poll cadence
    pub keep_polling: bool,
}

impl PollResponse {
    fn from_outcome(outcome: &PollOutcome) -> Self {
        let (status, message) = match outcome {
            PollOutcome::Success { .. } => (
                PollStatus::Authorized,
                "Authorization successful; credential saved".to_string(),
            ),
            PollOutcome::Pending => (
                PollStatus::Pending,
                "Authorization pending; keep polling".to_string(),
            ),
            PollOutcome::SlowDown { increase } => (
                PollStatus::SlowDown,
                format!(
                    "Provider requested a slower pace; add {}s to the polling interval",
                    increase
                ),
            ),
            PollOutcome::Expired => (
                PollStatus::Expired,
                "Device code expired; start a new login".to_string(),
            ),
            PollOutcome::Denied => (
                PollStatus::Denied,
                "Authorization was denied by the user".to_string(),
            ),
            PollOutcome::TransportError { detail } => (
                PollStatus::TransportError,
                format!("Transport failure: {}", detail),
            ),
            PollOutcome::ProviderError { code } => (
                PollStatus::ProviderError,
                format!("Provider returned unrecognized error: {}", code),
            ),
        };

        Self {
            status,
            message,
            keep_polling: outcome.should_keep_polling(),
        }
    }
}

/// Authentication service over all supported providers
pub struct AuthService {
    github: DeviceFlowClient,
    store: Arc<dyn CredentialStore>,
}

impl AuthService {
    /// Create the service from configuration and a credential sink
    pub fn new(config: &Config, store: Arc<dyn CredentialStore>) -> Result<Self> {
        Ok(Self {
            github: DeviceFlowClient::new(&config.provider.github)?,
            store,
        })
    }

    /// Start a device-code session for the given provider
    ///
    /// Safe to call from a non-blocking request context; performs exactly
    /// one network exchange.
    pub async fn initiate(&self, provider_id: &str) -> Result<DeviceSession> {
        match provider_id {
            GITHUB_COPILOT_PROVIDER => self.github.start().await,
            GOOGLE_PROVIDER => Err(ZauthError::Provider(
                "google uses application-default credentials; see setup guidance".to_string(),
            )
            .into()),
            other => {
                Err(ZauthError::Provider(format!("provider {} auth not implemented", other)).into())
            }
        }
    }

    /// Perform exactly one poll attempt for an externally-driven session
    ///
    /// No sleeping and no looping; the caller owns the cadence and decides
    /// when to stop based on `keep_polling`. A transport failure is
    /// surfaced as-is rather than retried, since retry policy belongs to
    /// the caller here. On success the credential is written exactly once.
    pub async fn poll_once(&self, provider_id: &str, device_code: &str) -> Result<PollResponse> {
        if provider_id != GITHUB_COPILOT_PROVIDER {
            return Err(ZauthError::Provider(format!(
                "provider {} does not support device-code polling",
                provider_id
            ))
            .into());
        }

        let outcome = self.github.poll_once(device_code).await;

        if let PollOutcome::Success { access_token } = &outcome {
            self.store.set(GITHUB_TOKEN_KEY, access_token)?;
            tracing::info!("GitHub credential stored");
        }

        Ok(PollResponse::from_outcome(&outcome))
    }

    /// Run the blocking poll loop until a terminal outcome
    ///
    /// Occupies the calling task for up to the session lifetime; appropriate
    /// only for contexts that may block that long (the CLI), never for a
    /// task serving concurrent requests. The first exchange happens after
    /// one full interval; the loop never polls at entry. Dropping the
    /// returned future mid-sleep aborts cleanly, since no state is written
    /// before a `Success` outcome.
    pub async fn run_to_completion(&self, session: &DeviceSession) -> Result<LoginOutcome> {
        let deadline = session.deadline();
        let mut interval = Duration::from_secs(session.interval);

        loop {
            if Instant::now() >= deadline {
                tracing::warn!("Device authorization timed out locally");
                return Ok(LoginOutcome::TimedOut);
            }

            tokio::time::sleep(interval).await;

            match self.github.poll_once(&session.device_code).await {
                PollOutcome::Success { access_token } => {
                    self.store.set(GITHUB_TOKEN_KEY, &access_token)?;
                    tracing::info!("GitHub credential stored");
                    return Ok(LoginOutcome::Authorized { access_token });
                }
                PollOutcome::Pending => {
                    tracing::debug!("Authorization pending; continuing to poll");
                }
                PollOutcome::SlowDown { increase } => {
                    // Compounds across repeated slow_down responses.
                    interval += Duration::from_secs(increase);
                    tracing::debug!(
                        "Provider requested a slower pace; interval is now {}s",
                        interval.as_secs()
                    );
                }
                PollOutcome::TransportError { detail } => {
                    // Transient; skip this attempt and retry on the next tick.
                    tracing::warn!("Transient transport failure during token poll: {}", detail);
                }
                PollOutcome::Expired => {
                    tracing::warn!("Provider declared the device code expired");
                    return Ok(LoginOutcome::Expired);
                }
                PollOutcome::Denied => {
                    tracing::warn!("Authorization denied by the user");
                    return Ok(LoginOutcome::Denied);
                }
                PollOutcome::ProviderError { code } => {
                    tracing::error!("Unrecognized provider error during token poll: {}", code);
                    return Ok(LoginOutcome::Failed { code });
                }
            }
        }
    }

    /// Setup guidance for providers that delegate to a local CLI flow
    ///
    /// Returns `None` for providers that use a real device-code flow.
    pub fn setup_guidance(&self, provider_id: &str) -> Option<String> {
        match provider_id {
            GOOGLE_PROVIDER => Some(
                "Google uses Application Default Credentials.\n\
                 Run the following command in your terminal:\n\n\
                 \tgcloud auth application-default login\n\n\
                 Alternatively, set the GOOGLE_API_KEY environment variable."
                    .to_string(),
            ),
            _ => None,
        }
    }

    /// Credential currently stored for the provider, if any
    pub fn stored_token(&self, provider_id: &str) -> Result<Option<String>> {
        match provider_id {
            GITHUB_COPILOT_PROVIDER => self.store.get(GITHUB_TOKEN_KEY),
            _ => Ok(None),
        }
    }
}
