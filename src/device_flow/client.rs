//! HTTP client for the device authorization grant
//!
//! [`DeviceFlowClient`] performs the two network exchanges of the flow: the
//! initiation request that yields a [`DeviceSession`], and the single-shot
//! token exchange that yields a [`PollOutcome`]. Pacing, looping, and
//! credential persistence live in [`crate::service`]; this client holds no
//! state beyond its endpoints.

use std::time::Duration;

use crate::config::GithubAuthConfig;
use crate::device_flow::types::{
    classify_token_response, DeviceCodeRequest, DeviceCodeResponse, DeviceSession, PollOutcome,
    TokenRequest, DEVICE_CODE_GRANT_TYPE,
};
use crate::error::{Result, ZauthError};

/// GitHub device-code endpoint
const GITHUB_DEVICE_CODE_URL: &str = "https://github.com/login/device/code";
/// GitHub token endpoint
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

/// Client for the OAuth 2.0 device authorization grant
pub struct DeviceFlowClient {
    http: reqwest::Client,
    device_code_url: String,
    token_url: String,
    client_id: String,
    scope: String,
}

impl DeviceFlowClient {
    /// Create a client from the GitHub auth configuration
    ///
    /// When `api_base` is set the endpoint paths are rebased onto it, which
    /// lets tests point the client at a mock server.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &GithubAuthConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("zauth/0.2.0")
            .build()
            .map_err(|e| ZauthError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        let (device_code_url, token_url) = match &config.api_base {
            Some(base) => {
                let base = base.trim_end_matches('/');
                (
                    format!("{}/login/device/code", base),
                    format!("{}/login/oauth/access_token", base),
                )
            }
            None => (
                GITHUB_DEVICE_CODE_URL.to_string(),
                GITHUB_TOKEN_URL.to_string(),
            ),
        };

        Ok(Self {
            http,
            device_code_url,
            token_url,
            client_id: config.client_id.clone(),
            scope: config.scope.clone(),
        })
    }

    /// Start the device authorization flow
    ///
    /// Sends one form-encoded POST to the device-code endpoint. Succeeds
    /// only if the decoded response carries `device_code`, `user_code`, and
    /// `verification_uri`; a 200 with a malformed or error body fails with
    /// the body in the message. No retry happens here; initiation is a
    /// single user-facing action and retry policy belongs to the caller.
    pub async fn start(&self) -> Result<DeviceSession> {
        let response = self
            .http
            .post(&self.device_code_url)
            .header("Accept", "application/json")
            .form(&DeviceCodeRequest {
                client_id: self.client_id.clone(),
                scope: self.scope.clone(),
            })
            .send()
            .await
            .map_err(|e| ZauthError::Initiation(format!("device code request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ZauthError::Initiation(format!("failed to read response body: {}", e)))?;

        if status != reqwest::StatusCode::OK {
            return Err(ZauthError::Initiation(format!(
                "device code request returned HTTP {}: {}",
                status, body
            ))
            .into());
        }

        let decoded: DeviceCodeResponse = serde_json::from_str(&body).map_err(|_| {
            ZauthError::Initiation(format!("malformed device code response: {}", body))
        })?;

        tracing::info!("Device authorization initiated");
        Ok(DeviceSession::from_response(decoded))
    }

    /// Perform exactly one token exchange attempt
    ///
    /// Never returns an error: every failure mode maps to a tagged
    /// [`PollOutcome`] that the caller must handle exhaustively. Performs no
    /// side effects; persistence on success is the caller's decision.
    pub async fn poll_once(&self, device_code: &str) -> PollOutcome {
        let response = self
            .http
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(&TokenRequest {
                client_id: self.client_id.clone(),
                device_code: device_code.to_string(),
                grant_type: DEVICE_CODE_GRANT_TYPE.to_string(),
            })
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                return PollOutcome::TransportError {
                    detail: format!("token request failed: {}", e),
                }
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return PollOutcome::TransportError {
                    detail: format!("failed to read token response: {}", e),
                }
            }
        };

        classify_token_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let client = DeviceFlowClient::new(&GithubAuthConfig::default()).unwrap();
        assert_eq!(client.device_code_url, "https://github.com/login/device/code");
        assert_eq!(client.token_url, "https://github.com/login/oauth/access_token");
    }

    #[test]
    fn test_api_base_rebases_endpoints() {
        let config = GithubAuthConfig {
            api_base: Some("http://127.0.0.1:9999/".to_string()),
            ..Default::default()
        };
        let client = DeviceFlowClient::new(&config).unwrap();
        assert_eq!(
            client.device_code_url,
            "http://127.0.0.1:9999/login/device/code"
        );
        assert_eq!(
            client.token_url,
            "http://127.0.0.1:9999/login/oauth/access_token"
        );
    }
}
