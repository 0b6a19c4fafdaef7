//! Wire types and outcome classification for the device authorization grant
//!
//! The classification function in this module is the single source of truth
//! for token-endpoint response semantics: both the blocking poll loop and
//! the single-step poll facade go through [`classify_token_response`], so
//! the two entry points cannot drift apart.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Grant type identifier for the device authorization grant (RFC 8628)
pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Default seconds between poll attempts when the provider omits `interval`
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Default device-code lifetime when the provider omits `expires_in`
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 900;

/// Fixed interval increase applied on a `slow_down` response
pub const SLOW_DOWN_INCREASE_SECS: u64 = 2;

/// Request for a device code
#[derive(Debug, Serialize)]
pub(crate) struct DeviceCodeRequest {
    pub client_id: String,
    pub scope: String,
}

/// Decoded device-code endpoint response
///
/// `device_code`, `user_code`, and `verification_uri` are required; a 200
/// response missing any of them fails to decode and is treated as an
/// initiation failure.
#[derive(Debug, Deserialize)]
pub(crate) struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    #[serde(default)]
    pub interval: Option<u64>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Request to exchange a device code for an access token
#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest {
    pub client_id: String,
    pub device_code: String,
    pub grant_type: String,
}

/// An active device-code session
///
/// Created by one successful initiation exchange and then immutable. The
/// session is consumed by poll attempts until a terminal outcome or the
/// local expiration deadline; it is never persisted.
#[derive(Clone)]
pub struct DeviceSession {
    /// Provider-issued code used only for token polling
    pub device_code: String,

    /// Short code the user enters at the verification URL
    pub user_code: String,

    /// URL the user visits to authorize the device
    pub verification_uri: String,

    /// Minimum seconds between poll attempts
    pub interval: u64,

    /// Seconds after which the device code becomes invalid
    pub expires_in: u64,

    created_at: Instant,
}

impl DeviceSession {
    pub(crate) fn from_response(response: DeviceCodeResponse) -> Self {
        Self {
            device_code: response.device_code,
            user_code: response.user_code,
            verification_uri: response.verification_uri,
            interval: response.interval.unwrap_or(DEFAULT_INTERVAL_SECS),
            expires_in: response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
            created_at: Instant::now(),
        }
    }

    /// Instant past which the device code must be treated as invalid locally,
    /// measured from session creation regardless of how many attempts occurred.
    pub fn deadline(&self) -> Instant {
        self.created_at + Duration::from_secs(self.expires_in)
    }
}

// The device code must never appear in logs or debug output.
impl fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceSession")
            .field("device_code", &"<redacted>")
            .field("user_code", &self.user_code)
            .field("verification_uri", &self.verification_uri)
            .field("interval", &self.interval)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Result of one token exchange attempt
///
/// Exactly one variant is produced per attempt. No variant implies a
/// credential write except `Success`, which triggers exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Terminal: the user authorized the device
    Success { access_token: String },

    /// Non-terminal: the user has not completed authorization yet
    Pending,

    /// Non-terminal: the provider asked the poller to back off
    SlowDown { increase: u64 },

    /// Terminal: the device code is no longer valid
    Expired,

    /// Terminal: the user rejected the authorization request
    Denied,

    /// Transport-level failure (non-200 status, network error, undecodable
    /// body). Transient inside the blocking loop; terminal for single-step
    /// callers, who own their own retry cadence.
    TransportError { detail: String },

    /// Terminal: an error code outside the recognized device-flow set
    ProviderError { code: String },
}

impl PollOutcome {
    /// Whether a caller driving its own poll cadence should try again
    pub fn should_keep_polling(&self) -> bool {
        matches!(self, Self::Pending | Self::SlowDown { .. })
    }
}

/// Terminal result of the blocking poll loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token obtained and persisted
    Authorized { access_token: String },

    /// Local deadline exceeded before the provider reported a terminal state
    TimedOut,

    /// Provider declared the device code expired
    Expired,

    /// User rejected the authorization request
    Denied,

    /// Provider returned an unrecognized error code
    Failed { code: String },
}

/// Classify one token-endpoint response into a [`PollOutcome`]
///
/// Classification order:
/// 1. non-200 status is a transport error; the body is not parsed,
/// 2. an undecodable body is a transport error,
/// 3. `access_token` wins over any `error` field in the same body,
/// 4. the recognized device-flow error codes map to their outcomes,
/// 5. anything else is a provider error carrying the raw code.
pub fn classify_token_response(status: StatusCode, body: &str) -> PollOutcome {
    if status != StatusCode::OK {
        return PollOutcome::TransportError {
            detail: format!("HTTP {}", status),
        };
    }

    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            return PollOutcome::TransportError {
                detail: format!("undecodable token response: {}", e),
            }
        }
    };

    if let Some(token) = value.get("access_token").and_then(|v| v.as_str()) {
        return PollOutcome::Success {
            access_token: token.to_string(),
        };
    }

    match value.get("error").and_then(|v| v.as_str()) {
        Some("authorization_pending") => PollOutcome::Pending,
        Some("slow_down") => PollOutcome::SlowDown {
            increase: SLOW_DOWN_INCREASE_SECS,
        },
        Some("expired_token") => PollOutcome::Expired,
        Some("access_denied") => PollOutcome::Denied,
        Some(other) => PollOutcome::ProviderError {
            code: other.to_string(),
        },
        None => PollOutcome::ProviderError {
            code: "unknown".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_success() {
        let outcome = classify_token_response(StatusCode::OK, r#"{"access_token":"tok"}"#);
        assert_eq!(
            outcome,
            PollOutcome::Success {
                access_token: "tok".to_string()
            }
        );
    }

    #[test]
    fn test_classify_token_precedence_over_error() {
        // A malformed response carrying both fields must classify as success.
        let body = r#"{"access_token":"tok","error":"access_denied"}"#;
        let outcome = classify_token_response(StatusCode::OK, body);
        assert_eq!(
            outcome,
            PollOutcome::Success {
                access_token: "tok".to_string()
            }
        );
    }

    #[test]
    fn test_classify_non_200_is_transport_error_regardless_of_body() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
        ] {
            let outcome = classify_token_response(status, r#"{"access_token":"tok"}"#);
            assert!(
                matches!(outcome, PollOutcome::TransportError { .. }),
                "expected transport error for {}",
                status
            );
        }
    }

    #[test]
    fn test_classify_authorization_pending() {
        let outcome =
            classify_token_response(StatusCode::OK, r#"{"error":"authorization_pending"}"#);
        assert_eq!(outcome, PollOutcome::Pending);
    }

    #[test]
    fn test_classify_slow_down_carries_fixed_increase() {
        let outcome = classify_token_response(StatusCode::OK, r#"{"error":"slow_down"}"#);
        assert_eq!(outcome, PollOutcome::SlowDown { increase: 2 });
    }

    #[test]
    fn test_classify_expired_token() {
        let outcome = classify_token_response(StatusCode::OK, r#"{"error":"expired_token"}"#);
        assert_eq!(outcome, PollOutcome::Expired);
    }

    #[test]
    fn test_classify_access_denied() {
        let outcome = classify_token_response(StatusCode::OK, r#"{"error":"access_denied"}"#);
        assert_eq!(outcome, PollOutcome::Denied);
    }

    #[test]
    fn test_classify_unrecognized_error_code() {
        let outcome =
            classify_token_response(StatusCode::OK, r#"{"error":"unsupported_grant_type"}"#);
        assert_eq!(
            outcome,
            PollOutcome::ProviderError {
                code: "unsupported_grant_type".to_string()
            }
        );
    }

    #[test]
    fn test_classify_body_with_neither_field() {
        let outcome = classify_token_response(StatusCode::OK, r#"{"hello":"world"}"#);
        assert_eq!(
            outcome,
            PollOutcome::ProviderError {
                code: "unknown".to_string()
            }
        );
    }

    #[test]
    fn test_classify_undecodable_body_is_transport_error() {
        let outcome = classify_token_response(StatusCode::OK, "<html>gateway error</html>");
        assert!(matches!(outcome, PollOutcome::TransportError { .. }));
    }

    #[test]
    fn test_should_keep_polling() {
        assert!(PollOutcome::Pending.should_keep_polling());
        assert!(PollOutcome::SlowDown { increase: 2 }.should_keep_polling());
        assert!(!PollOutcome::Expired.should_keep_polling());
        assert!(!PollOutcome::Denied.should_keep_polling());
        assert!(!PollOutcome::TransportError {
            detail: "HTTP 500".to_string()
        }
        .should_keep_polling());
        assert!(!PollOutcome::Success {
            access_token: "tok".to_string()
        }
        .should_keep_polling());
    }

    #[test]
    fn test_device_code_response_defaults() {
        let body = r#"{
            "device_code": "d1",
            "user_code": "U1",
            "verification_uri": "https://x"
        }"#;
        let response: DeviceCodeResponse = serde_json::from_str(body).unwrap();
        let session = DeviceSession::from_response(response);
        assert_eq!(session.interval, DEFAULT_INTERVAL_SECS);
        assert_eq!(session.expires_in, DEFAULT_EXPIRES_IN_SECS);
    }

    #[test]
    fn test_device_code_response_missing_required_field_fails() {
        let body = r#"{"user_code": "U1", "verification_uri": "https://x"}"#;
        assert!(serde_json::from_str::<DeviceCodeResponse>(body).is_err());
    }

    #[test]
    fn test_session_debug_redacts_device_code() {
        let response: DeviceCodeResponse = serde_json::from_str(
            r#"{"device_code":"secret-d1","user_code":"U1","verification_uri":"https://x"}"#,
        )
        .unwrap();
        let session = DeviceSession::from_response(response);
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret-d1"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("U1"));
    }

    #[test]
    fn test_session_deadline_tracks_expires_in() {
        let response: DeviceCodeResponse = serde_json::from_str(
            r#"{"device_code":"d1","user_code":"U1","verification_uri":"https://x","interval":5,"expires_in":900}"#,
        )
        .unwrap();
        let session = DeviceSession::from_response(response);
        let remaining = session.deadline() - Instant::now();
        assert!(remaining <= Duration::from_secs(900));
        assert!(remaining > Duration::from_secs(895));
    }
}
