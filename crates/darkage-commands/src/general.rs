//! General purpose commands: latency, help, server info and profiles.

use crate::content::InfoContent;
use crate::framework::{colors, send_embed, Context, Error};
use chrono::DateTime;
use darkage_common::{format_date, format_uptime, truncate_string};
use poise::serenity_prelude as serenity;

/// Checks that the bot is responsive.
#[poise::command(slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;
    ctx.say(format!("🏓 Pong! Gateway latency: {}ms", latency.as_millis()))
        .await?;
    Ok(())
}

/// Lists the available commands.
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let store = &ctx.data().store;
    let lines: Vec<String> = ctx
        .framework()
        .options()
        .commands
        .iter()
        .filter(|command| store.is_command_enabled(&command.name))
        .map(|command| {
            format!(
                "`/{}` {}",
                command.name,
                command.description.as_deref().unwrap_or_default()
            )
        })
        .collect();

    let embed = serenity::CreateEmbed::new()
        .title("📖 DarkAge Bot Commands")
        .description(truncate_string(&lines.join("\n"), 4096))
        .color(colors::INFO)
        .footer(serenity::CreateEmbedFooter::new(
            "Use the slash menu to run a command.",
        ));
    send_embed(ctx, embed).await
}

/// Shows general information about the server.
#[poise::command(slash_command)]
pub async fn info(ctx: Context<'_>) -> Result<(), Error> {
    let reply = match ctx.data().content.info().await {
        InfoContent::Text(text) => {
            let embed = serenity::CreateEmbed::new()
                .title("📘 Server Information")
                .description(truncate_string(&text, 4096))
                .color(colors::INFO)
                .footer(serenity::CreateEmbedFooter::new("Last updated"))
                .timestamp(serenity::Timestamp::now());
            return send_embed(ctx, embed).await;
        }
        other => info_failure_reply(&other),
    };
    ctx.send(poise::CreateReply::default().content(reply).ephemeral(true))
        .await?;
    Ok(())
}

/// Shows details about this Discord server.
#[poise::command(slash_command, guild_only)]
pub async fn server(ctx: Context<'_>) -> Result<(), Error> {
    let embed = ctx.guild().map(|guild| {
        let mut embed = serenity::CreateEmbed::new()
            .title(format!("🏰 {}", guild.name))
            .color(colors::PROFILE)
            .field("Owner", format!("<@{}>", guild.owner_id), true)
            .field("Members", guild.member_count.to_string(), true)
            .field("Created", discord_date(guild.id.created_at()), true)
            .field("Boost Level", u8::from(guild.premium_tier).to_string(), true)
            .field("Roles", guild.roles.len().to_string(), true)
            .field("Emojis", guild.emojis.len().to_string(), true)
            .footer(serenity::CreateEmbedFooter::new(format!("Server ID: {}", guild.id)));
        if let Some(icon) = guild.icon_url() {
            embed = embed.thumbnail(icon);
        }
        embed
    });

    match embed {
        Some(embed) => send_embed(ctx, embed).await,
        None => {
            ctx.say("Server details are not available yet, try again shortly.")
                .await?;
            Ok(())
        }
    }
}

/// Shows details about a member.
#[poise::command(slash_command)]
pub async fn user(
    ctx: Context<'_>,
    #[description = "Member to look up, defaults to you"] target: Option<serenity::User>,
) -> Result<(), Error> {
    let user = target.as_ref().unwrap_or_else(|| ctx.author());

    let member = match ctx.guild_id() {
        Some(guild_id) => guild_id.member(ctx.serenity_context(), user.id).await.ok(),
        None => None,
    };

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("👤 {}", user.tag()))
        .color(colors::PROFILE)
        .thumbnail(user.face())
        .field("Account Created", discord_date(user.id.created_at()), true)
        .field("Bot", if user.bot { "Yes" } else { "No" }, true)
        .footer(serenity::CreateEmbedFooter::new(format!("User ID: {}", user.id)));
    if let Some(member) = member {
        let joined = member
            .joined_at
            .map_or_else(|| "Unknown".to_string(), discord_date);
        embed = embed
            .field("Joined Server", joined, true)
            .field("Roles", member.roles.len().to_string(), true);
    }
    send_embed(ctx, embed).await
}

/// Shows information about the bot.
#[poise::command(slash_command)]
pub async fn about(ctx: Context<'_>) -> Result<(), Error> {
    let avatar = ctx.cache().current_user().face();
    let guilds = ctx.cache().guild_count();
    let uptime = format_uptime(ctx.data().started_at.elapsed().as_secs());

    let embed = serenity::CreateEmbed::new()
        .title("🤖 About DarkAge Bot")
        .description("Community bot for the DarkAge SMP Minecraft server.")
        .color(colors::ABOUT)
        .thumbnail(avatar)
        .field("Version", env!("CARGO_PKG_VERSION"), true)
        .field("Servers", guilds.to_string(), true)
        .field("Uptime", uptime, true)
        .field("Library", "poise + serenity", true);
    send_embed(ctx, embed).await
}

/// Calendar date of a Discord timestamp.
fn discord_date(timestamp: serenity::Timestamp) -> String {
    DateTime::from_timestamp(timestamp.unix_timestamp(), 0)
        .map_or_else(|| "Unknown".to_string(), format_date)
}

/// Reply for an info file that could not be shown.
pub fn info_failure_reply(content: &InfoContent) -> &'static str {
    match content {
        InfoContent::Missing => "❌ No server information has been published yet.",
        InfoContent::Empty => "⚠️ The server information page is empty.",
        InfoContent::PermissionDenied => "❌ The bot is not allowed to read the server information.",
        InfoContent::InvalidEncoding => "❌ The server information file is not valid UTF-8.",
        InfoContent::Unreadable | InfoContent::Text(_) => {
            "❌ The server information could not be loaded."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_failure_replies_are_distinct() {
        let replies = [
            info_failure_reply(&InfoContent::Missing),
            info_failure_reply(&InfoContent::Empty),
            info_failure_reply(&InfoContent::PermissionDenied),
            info_failure_reply(&InfoContent::InvalidEncoding),
            info_failure_reply(&InfoContent::Unreadable),
        ];
        for (i, a) in replies.iter().enumerate() {
            for b in &replies[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_discord_date() {
        let timestamp = serenity::Timestamp::from_unix_timestamp(1_704_110_400).unwrap();
        assert_eq!(discord_date(timestamp), "2024-01-01");
    }
}
