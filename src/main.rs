//! Zauth - Device-flow credential manager CLI
//!
//! Main entry point for the Zauth credential manager.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use zauth::cli::{Cli, Commands};
use zauth::commands;
use zauth::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Auth { provider } => {
            // Use CLI `--provider` override when supplied; otherwise fall back to the
            // configured/default provider from `config`.
            let provider = provider.unwrap_or_else(|| config.provider.provider_type.clone());
            tracing::info!("Starting authentication for provider: {}", provider);
            commands::auth::authenticate(config, provider).await?;
            Ok(())
        }
        Commands::Status { provider } => {
            let provider = provider.unwrap_or_else(|| config.provider.provider_type.clone());
            commands::auth::show_status(config, provider).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "zauth=debug" } else { "zauth=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
