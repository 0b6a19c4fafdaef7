//! OAuth 2.0 Device Authorization Grant (RFC 8628)
//!
//! The flow has two network exchanges and one local state machine:
//!
//! 1. Initiation ([`DeviceFlowClient::start`]) requests a device code, a
//!    user code, and a verification URI from the provider.
//! 2. Token exchange ([`DeviceFlowClient::poll_once`]) performs exactly one
//!    poll attempt and classifies the response into a [`PollOutcome`].
//! 3. The pacing/backoff/expiration policy around repeated exchanges lives
//!    in [`crate::service::AuthService`], which offers both a blocking loop
//!    and a caller-driven single-step mode over the same exchange step.

pub mod client;
pub mod types;

pub use client::DeviceFlowClient;
pub use types::{
    classify_token_response, DeviceSession, LoginOutcome, PollOutcome, DEFAULT_EXPIRES_IN_SECS,
    DEFAULT_INTERVAL_SECS, SLOW_DOWN_INCREASE_SECS,
};
