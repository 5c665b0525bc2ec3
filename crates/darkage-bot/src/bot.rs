//! Core bot logic using the Poise framework.

use crate::dashboard::{self, DashboardState};
use crate::error::BotResult;
use darkage_commands::{create_framework, ContentFiles, Data};
use darkage_config::{ConfigStore, Settings};
use darkage_status::StatusFetcher;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Main bot structure.
pub struct DarkageBot {
    settings: Settings,
    store: Arc<ConfigStore>,
    status: StatusFetcher,
    content: Arc<ContentFiles>,
}

impl DarkageBot {
    /// Creates a new bot instance around an already loaded store.
    pub fn new(settings: Settings, store: Arc<ConfigStore>) -> BotResult<Self> {
        let content = Arc::new(ContentFiles::new(settings.paths.content_dir.clone()));
        Ok(Self {
            settings,
            store,
            status: StatusFetcher::new()?,
            content,
        })
    }

    /// Starts the dashboard, then runs the Discord client until shutdown.
    pub async fn start(&self) -> BotResult<()> {
        if self.settings.dashboard.enabled {
            self.spawn_dashboard();
        } else {
            info!("Dashboard disabled");
        }

        let store = Arc::clone(&self.store);
        let status = self.status.clone();
        let content = Arc::clone(&self.content);

        let framework = create_framework()
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!(user = %ready.user.name, commands = framework.options().commands.len(), "Slash commands registered");
                    Ok(Data::new(store, status, content))
                })
            })
            .build();

        let intents = serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::GUILD_MEMBERS;
        let mut client = serenity::ClientBuilder::new(&self.settings.discord.token, intents)
            .framework(framework)
            .await?;

        let shard_manager = Arc::clone(&client.shard_manager);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, shutting down");
                    shard_manager.shutdown_all().await;
                }
                Err(e) => warn!(error = %e, "Could not listen for shutdown signal"),
            }
        });

        client.start().await?;
        info!("Bot stopped");
        Ok(())
    }

    fn spawn_dashboard(&self) {
        let state = DashboardState::new(
            Arc::clone(&self.store),
            &self.settings.dashboard,
            self.settings.discord.owner_id,
        );
        let address = self.settings.dashboard.socket_address();
        tokio::spawn(async move {
            if let Err(e) = dashboard::serve(state, &address).await {
                error!(address = %address, error = %e, "Dashboard stopped");
            }
        });
    }
}

impl std::fmt::Debug for DarkageBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DarkageBot")
            .field("settings", &self.settings)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
