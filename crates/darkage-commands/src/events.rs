//! Gateway event handling.

use crate::framework::{Data, Error};
use darkage_config::keys;
use poise::serenity_prelude as serenity;
use serenity::Mentionable;
use tracing::{debug, info, warn};

/// Placeholder in the welcome template replaced by the member mention.
pub const USER_PLACEHOLDER: &str = "{user}";

/// Welcome message used when the config document has none.
const FALLBACK_WELCOME: &str = "Welcome {user}!";

/// Dispatches gateway events the bot reacts to.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(user = %data_about_bot.user.name, guilds = data_about_bot.guilds.len(), "Bot connected");
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            welcome_member(ctx, data, new_member).await;
        }
        _ => {}
    }
    Ok(())
}

async fn welcome_member(ctx: &serenity::Context, data: &Data, member: &serenity::Member) {
    let Some(channel) = data.store.welcome_channel() else {
        debug!(user = %member.user.name, "Welcome messages are off");
        return;
    };

    let template = data
        .store
        .get_str(keys::WELCOME_MESSAGE)
        .unwrap_or_else(|| FALLBACK_WELCOME.to_string());
    let message = render_welcome(&template, &member.mention().to_string());

    match serenity::ChannelId::new(channel.0).say(ctx, message).await {
        Ok(_) => info!(user = %member.user.name, channel = channel.0, "Sent welcome message"),
        Err(e) => warn!(channel = channel.0, error = %e, "Failed to send welcome message"),
    }
}

/// Fills every `{user}` in `template` with `mention`.
pub fn render_welcome(template: &str, mention: &str) -> String {
    template.replace(USER_PLACEHOLDER, mention)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_welcome_replaces_placeholder() {
        assert_eq!(
            render_welcome("Welcome {user} to DarkAge SMP!", "<@42>"),
            "Welcome <@42> to DarkAge SMP!"
        );
    }

    #[test]
    fn test_render_welcome_without_placeholder() {
        assert_eq!(render_welcome("Hello there", "<@42>"), "Hello there");
        assert_eq!(render_welcome("{user} and {user}", "<@1>"), "<@1> and <@1>");
    }
}
