//! Provider authentication command handler
//!
//! Runs the interactive device-flow login for providers that support it and
//! prints setup guidance for providers that delegate to a local CLI flow.
//! This is the only place in the crate that may block for the whole device
//! code lifetime; request-serving callers go through
//! [`AuthService::poll_once`] instead.

use std::sync::Arc;

use colored::Colorize;

use crate::config::Config;
use crate::device_flow::LoginOutcome;
use crate::error::{Result, ZauthError};
use crate::service::{AuthService, GITHUB_COPILOT_PROVIDER, GOOGLE_PROVIDER};
use crate::storage::KeyringStore;

/// Map CLI-friendly aliases onto canonical provider ids
fn canonical_provider(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "copilot" | "github" => GITHUB_COPILOT_PROVIDER.to_string(),
        other => other.to_string(),
    }
}

/// Trigger provider-specific authentication flow or instructions
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `provider` - Provider name (e.g. "github_copilot", "google")
pub async fn authenticate(config: Config, provider: String) -> Result<()> {
    let provider = canonical_provider(&provider);
    tracing::info!("Starting authentication for provider: {}", provider);

    match provider.as_str() {
        GITHUB_COPILOT_PROVIDER => github_device_login(config).await,
        GOOGLE_PROVIDER => {
            let store = Arc::new(KeyringStore::new());
            let service = AuthService::new(&config, store)?;
            println!("{}", "Google Authentication Setup".purple());
            println!("{}", "---------------------------".purple());
            if let Some(guidance) = service.setup_guidance(GOOGLE_PROVIDER) {
                println!("{}", guidance);
            }
            Ok(())
        }
        other => Err(ZauthError::Provider(format!("Unsupported provider: {}", other)).into()),
    }
}

/// Run the blocking GitHub device-flow login
async fn github_device_login(config: Config) -> Result<()> {
    let store = Arc::new(KeyringStore::new());
    let service = AuthService::new(&config, store)?;

    if let Ok(Some(_)) = service.stored_token(GITHUB_COPILOT_PROVIDER) {
        println!(
            "{}",
            "An existing credential is stored and will be overwritten.".dimmed()
        );
    }

    println!(
        "{}",
        "Initiating GitHub Copilot authentication...".purple()
    );
    let session = service.initiate(GITHUB_COPILOT_PROVIDER).await?;

    println!();
    println!(
        "{}",
        format!("Please visit: {}", session.verification_uri).green()
    );
    println!("{}", format!("Enter code: {}", session.user_code).green());
    println!();
    println!(
        "{}",
        "Waiting for authorization... (Ctrl+C to cancel)".purple()
    );

    // Dropping the login future mid-sleep is safe: nothing is persisted
    // before a Success outcome.
    let outcome = tokio::select! {
        result = service.run_to_completion(&session) => result?,
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("{}", "Authentication cancelled.".yellow());
            return Ok(());
        }
    };

    match outcome {
        LoginOutcome::Authorized { .. } => {
            println!(
                "{}",
                "Authentication successful! Token saved to the system keyring.".green()
            );
            Ok(())
        }
        LoginOutcome::TimedOut => {
            eprintln!("{}", "Authentication timed out.".red());
            Err(ZauthError::Authentication(
                "timed out waiting for authorization".to_string(),
            )
            .into())
        }
        LoginOutcome::Expired => {
            eprintln!("{}", "The device code expired.".red());
            Err(ZauthError::Authentication(
                "device code expired; run `zauth auth` again".to_string(),
            )
            .into())
        }
        LoginOutcome::Denied => {
            eprintln!("{}", "Authorization was denied.".red());
            Err(ZauthError::Authentication("authorization was denied".to_string()).into())
        }
        LoginOutcome::Failed { code } => {
            eprintln!(
                "{}",
                format!("Authentication failed with provider error: {}", code).red()
            );
            Err(ZauthError::Authentication(format!(
                "provider returned unrecognized error: {}",
                code
            ))
            .into())
        }
    }
}

/// Show whether a credential is stored for the provider
pub async fn show_status(config: Config, provider: String) -> Result<()> {
    let provider = canonical_provider(&provider);
    let store = Arc::new(KeyringStore::new());
    let service = AuthService::new(&config, store)?;

    match provider.as_str() {
        GITHUB_COPILOT_PROVIDER => {
            match service.stored_token(GITHUB_COPILOT_PROVIDER)? {
                Some(_) => println!(
                    "{}",
                    "github_copilot: credential stored in the system keyring.".green()
                ),
                None => println!(
                    "{}",
                    "github_copilot: no credential stored; run `zauth auth`.".yellow()
                ),
            }
            Ok(())
        }
        GOOGLE_PROVIDER => {
            println!("google: zauth does not store a credential for this provider.");
            if let Some(guidance) = service.setup_guidance(GOOGLE_PROVIDER) {
                println!("{}", guidance);
            }
            Ok(())
        }
        other => Err(ZauthError::Provider(format!("Unsupported provider: {}", other)).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_provider_aliases() {
        assert_eq!(canonical_provider("copilot"), "github_copilot");
        assert_eq!(canonical_provider("github"), "github_copilot");
        assert_eq!(canonical_provider("GitHub_Copilot"), "github_copilot");
        assert_eq!(canonical_provider("google"), "google");
        assert_eq!(canonical_provider("nope"), "nope");
    }

    #[tokio::test]
    async fn test_auth_unknown_provider_fails() {
        let cfg = Config::default();
        let res = authenticate(cfg, "nope".to_string()).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_status_unknown_provider_fails() {
        let cfg = Config::default();
        let res = show_status(cfg, "nope".to_string()).await;
        assert!(res.is_err());
    }
}
