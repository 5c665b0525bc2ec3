//! Poise framework setup and command registration logic.

use crate::content::ContentFiles;
use darkage_config::ConfigStore;
use darkage_status::StatusFetcher;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

/// Reply sent when a command is switched off in the config document.
pub const DISABLED_REPLY: &str = "This command is disabled.";

/// Embed colours shared by the commands.
pub mod colors {
    use poise::serenity_prelude::Colour;

    /// Informational embeds.
    pub const INFO: Colour = Colour(0x3498db);
    /// Positive results.
    pub const SUCCESS: Colour = Colour(0x2ecc71);
    /// Guild and user profiles.
    pub const PROFILE: Colour = Colour(0x9b59b6);
    /// Announcements.
    pub const NEWS: Colour = Colour(0xe67e22);
    /// Bot information.
    pub const ABOUT: Colour = Colour(0x2c3e50);
    /// Failures shown to users.
    pub const ERROR: Colour = Colour(0xe74c3c);
}

/// Application data accessible in all commands.
pub struct Data {
    /// Shared configuration store.
    pub store: Arc<ConfigStore>,
    /// Game server status client.
    pub status: StatusFetcher,
    /// Markdown content files.
    pub content: Arc<ContentFiles>,
    /// When the process started.
    pub started_at: Instant,
}

impl Data {
    /// Bundles the shared services for the framework.
    pub fn new(store: Arc<ConfigStore>, status: StatusFetcher, content: Arc<ContentFiles>) -> Self {
        Self {
            store,
            status,
            content,
            started_at: Instant::now(),
        }
    }
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("store", &self.store)
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}

/// Application error type for commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Every command the bot registers.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        crate::general::ping(),
        crate::general::help(),
        crate::general::info(),
        crate::general::server(),
        crate::general::user(),
        crate::general::about(),
        crate::minecraft::ip(),
        crate::minecraft::status(),
        crate::minecraft::players(),
        crate::minecraft::version(),
        crate::minecraft::motd(),
        crate::links::vote(),
        crate::links::website(),
        crate::links::store(),
        crate::links::rules(),
        crate::news::news(),
        crate::roster::player(),
    ]
}

/// Creates a new Poise framework.
pub fn create_framework() -> poise::FrameworkBuilder<Data, Error> {
    poise::Framework::builder().options(poise::FrameworkOptions {
        commands: commands(),
        command_check: Some(|ctx| Box::pin(command_enabled(ctx))),
        on_error: |error| Box::pin(on_error(error)),
        pre_command: |ctx| {
            Box::pin(async move {
                debug!(command = %ctx.command().qualified_name, user = %ctx.author().name, "Executing command");
            })
        },
        event_handler: |ctx, event, framework, data| {
            Box::pin(crate::events::event_handler(ctx, event, framework, data))
        },
        ..Default::default()
    })
}

/// Looks up the top-level command's flag, so subcommands follow their parent.
async fn command_enabled(ctx: Context<'_>) -> Result<bool, Error> {
    let name = ctx
        .parent_commands()
        .first()
        .map_or(ctx.command().name.as_str(), |parent| parent.name.as_str());
    Ok(ctx.data().store.is_command_enabled(name))
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::CommandCheckFailed { error: None, ctx, .. } => {
            let reply = poise::CreateReply::default()
                .content(DISABLED_REPLY)
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                warn!(error = %e, "Failed to send disabled-command reply");
            }
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().qualified_name, error = %error, "Command failed");
            let reply = poise::CreateReply::default()
                .content("Something went wrong while running this command.")
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                warn!(error = %e, "Failed to report command error");
            }
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(event = event.snake_case_name(), error = %error, "Event handler failed");
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!(error = %e, "Error while handling framework error");
            }
        }
    }
}

/// Sends an embed as the reply to `ctx`.
pub(crate) async fn send_embed(ctx: Context<'_>, embed: serenity::CreateEmbed) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
