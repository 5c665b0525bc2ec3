//! Game server commands backed by the status API.

use crate::framework::{colors, send_embed, Context, Error};
use darkage_common::{truncate_string, ServerAddress};
use darkage_status::ServerStatus;
use poise::serenity_prelude as serenity;

const OFFLINE_REPLY: &str = "❌ The server is currently offline or unreachable.";
const MESSAGE_LIMIT: usize = 2000;

/// Shows the server address.
#[poise::command(slash_command)]
pub async fn ip(ctx: Context<'_>) -> Result<(), Error> {
    let address = ctx.data().store.server_address();
    ctx.say(format!("🌍 **Server IP:** `{address}`")).await?;
    Ok(())
}

/// Shows whether the server is online.
#[poise::command(slash_command)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;
    let address = ctx.data().store.server_address();
    match ctx.data().status.online_status(&address).await {
        Some(status) => send_embed(ctx, status_embed(&status, &address)).await,
        None => {
            ctx.say(OFFLINE_REPLY).await?;
            Ok(())
        }
    }
}

/// Lists the players currently online.
#[poise::command(slash_command)]
pub async fn players(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;
    let address = ctx.data().store.server_address();
    let reply = match ctx.data().status.online_status(&address).await {
        Some(status) => player_list_message(&status),
        None => OFFLINE_REPLY.to_string(),
    };
    ctx.say(reply).await?;
    Ok(())
}

/// Shows the server version.
#[poise::command(slash_command)]
pub async fn version(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;
    let address = ctx.data().store.server_address();
    let reply = match ctx.data().status.online_status(&address).await {
        Some(status) => format!("🛠️ **Server Version:** {}", status.version_or_unknown()),
        None => OFFLINE_REPLY.to_string(),
    };
    ctx.say(reply).await?;
    Ok(())
}

/// Shows the server message of the day.
#[poise::command(slash_command)]
pub async fn motd(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;
    let address = ctx.data().store.server_address();
    let reply = match ctx.data().status.online_status(&address).await {
        Some(status) => format!("📜 **MOTD:** {}", status.motd_line()),
        None => OFFLINE_REPLY.to_string(),
    };
    ctx.say(reply).await?;
    Ok(())
}

fn status_embed(status: &ServerStatus, address: &ServerAddress) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("🟢 Server Status")
        .color(colors::SUCCESS)
        .field("Status", "Online", true)
        .field(
            "Players",
            format!("{}/{}", status.players.online, status.players.max),
            true,
        )
        .field("Version", status.version_or_unknown(), true)
        .field("MOTD", status.motd_line(), false)
        .footer(serenity::CreateEmbedFooter::new(format!("IP: {address}")))
}

/// Player count followed by one bullet per online player.
pub fn player_list_message(status: &ServerStatus) -> String {
    let names = status.player_names();
    let mut message = format!(
        "🧑‍🚀 **Players Online:** {}/{}",
        status.players.online, status.players.max
    );
    if names.is_empty() {
        message.push_str("\nNo player names are being reported.");
    } else {
        for name in names {
            message.push_str("\n• ");
            message.push_str(name);
        }
    }
    truncate_string(&message, MESSAGE_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkage_status::{PlayerEntry, Players};

    fn online_with(names: &[&str]) -> ServerStatus {
        ServerStatus {
            online: true,
            players: Players {
                online: u32::try_from(names.len()).unwrap(),
                max: 20,
                list: names.iter().map(|n| PlayerEntry::Name((*n).to_string())).collect(),
            },
            ..ServerStatus::default()
        }
    }

    #[test]
    fn test_player_list_message_lists_names() {
        let message = player_list_message(&online_with(&["Steve", "Alex"]));
        assert_eq!(message, "🧑‍🚀 **Players Online:** 2/20\n• Steve\n• Alex");
    }

    #[test]
    fn test_player_list_message_without_names() {
        let message = player_list_message(&online_with(&[]));
        assert!(message.starts_with("🧑‍🚀 **Players Online:** 0/20"));
        assert!(message.contains("No player names"));
    }

    #[test]
    fn test_player_list_message_is_truncated() {
        let names: Vec<String> = (0..300).map(|i| format!("Player_{i:04}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let message = player_list_message(&online_with(&refs));
        assert!(message.chars().count() <= MESSAGE_LIMIT);
        assert!(message.ends_with("..."));
    }
}
