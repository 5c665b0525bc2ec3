//! Announcement command.

use crate::framework::{colors, send_embed, Context, Error};
use darkage_common::truncate_string;
use poise::serenity_prelude as serenity;
use tracing::error;

/// Shows the latest server announcement.
#[poise::command(slash_command)]
pub async fn news(ctx: Context<'_>) -> Result<(), Error> {
    match ctx.data().content.latest_notice().await {
        Ok(Some(entry)) => {
            let embed = serenity::CreateEmbed::new()
                .title("📢 Latest News")
                .description(truncate_string(&entry, 4096))
                .color(colors::NEWS);
            send_embed(ctx, embed).await
        }
        Ok(None) => {
            ctx.say("No announcements yet.").await?;
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Failed to read announcements");
            ctx.say("❌ Announcements are unavailable right now.").await?;
            Ok(())
        }
    }
}
