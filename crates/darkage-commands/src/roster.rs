//! Player roster subcommands.

use crate::content::AddPlayerOutcome;
use crate::framework::{colors, send_embed, Context, Error};
use darkage_common::{truncate_string, DarkageError};
use poise::serenity_prelude as serenity;
use tracing::error;

/// Player roster commands.
#[poise::command(slash_command, subcommands("add", "list"))]
pub async fn player(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Add a player to the roster.
#[poise::command(slash_command, default_member_permissions = "MANAGE_GUILD")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Minecraft player name"] name: String,
) -> Result<(), Error> {
    let reply = match ctx.data().content.add_player(&name).await {
        Ok(AddPlayerOutcome::Added(name)) => format!("✅ Added **{name}** to the player list."),
        Ok(AddPlayerOutcome::AlreadyListed(name)) => {
            format!("⚠️ **{name}** is already on the player list.")
        }
        Err(DarkageError::Content(reason)) => format!("❌ {reason}."),
        Err(e) => {
            error!(error = %e, "Failed to update the roster");
            "❌ The player list could not be updated.".to_string()
        }
    };
    ctx.send(poise::CreateReply::default().content(reply).ephemeral(true))
        .await?;
    Ok(())
}

/// List the players on the roster.
#[poise::command(slash_command)]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let players = match ctx.data().content.players().await {
        Ok(players) => players,
        Err(e) => {
            error!(error = %e, "Failed to read the roster");
            ctx.say("❌ The player list is unavailable right now.").await?;
            return Ok(());
        }
    };

    let embed = serenity::CreateEmbed::new()
        .title(format!("👥 Players ({})", players.len()))
        .description(truncate_string(&roster_description(&players), 4096))
        .color(colors::INFO);
    send_embed(ctx, embed).await
}

/// Bulleted roster, or a note when it is empty.
pub fn roster_description(players: &[String]) -> String {
    if players.is_empty() {
        "No players have been added yet.".to_string()
    } else {
        players
            .iter()
            .map(|name| format!("• {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
