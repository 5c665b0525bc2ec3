//! Main entry point for DarkAge Bot.

use anyhow::Context as _;
use darkage_bot::DarkageBot;
use darkage_config::{ConfigStore, Settings};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Optional `KEY=value` file read next to the process environment.
const ENV_FILE: &str = ".env";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "darkage_bot=info,darkage_commands=info,darkage_config=info,darkage_status=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting DarkAge Bot");

    let settings = Settings::from_env(ENV_FILE).context("reading settings from the environment")?;
    settings.validate().context("invalid settings")?;

    // The store is loaded before anything can read from it
    let store = Arc::new(ConfigStore::open(&settings.paths.config_path));

    let bot = DarkageBot::new(settings, store).context("building the bot")?;
    if let Err(e) = bot.start().await {
        error!(error = %e, "Bot failed");
        return Err(e.into());
    }

    Ok(())
}
