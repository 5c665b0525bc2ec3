//! Community link commands read straight from the config document.

use crate::framework::{colors, send_embed, Context, Error};
use darkage_common::truncate_string;
use darkage_config::keys;
use poise::serenity_prelude as serenity;

const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Shows the server voting links.
#[poise::command(slash_command)]
pub async fn vote(ctx: Context<'_>) -> Result<(), Error> {
    let links = ctx.data().store.get_list(keys::LINK_VOTE).unwrap_or_default();
    let embed = serenity::CreateEmbed::new()
        .title("🗳️ Vote for DarkAge SMP")
        .description(vote_description(&links))
        .color(colors::INFO)
        .footer(serenity::CreateEmbedFooter::new(
            "Thank you for supporting the server!",
        ));
    send_embed(ctx, embed).await
}

/// Shows the community website.
#[poise::command(slash_command)]
pub async fn website(ctx: Context<'_>) -> Result<(), Error> {
    let reply = match ctx.data().store.get_str(keys::LINK_WEBSITE) {
        Some(url) if !url.is_empty() => format!("🌐 **Website:** <{url}>"),
        _ => "No website link is configured.".to_string(),
    };
    ctx.say(reply).await?;
    Ok(())
}

/// Shows the server store.
#[poise::command(slash_command)]
pub async fn store(ctx: Context<'_>) -> Result<(), Error> {
    let reply = match ctx.data().store.get_str(keys::LINK_STORE) {
        Some(url) if !url.is_empty() => format!("🛒 **Store:** <{url}>"),
        _ => "No store link is configured.".to_string(),
    };
    ctx.say(reply).await?;
    Ok(())
}

/// Shows the server rules.
#[poise::command(slash_command)]
pub async fn rules(ctx: Context<'_>) -> Result<(), Error> {
    let rules = ctx
        .data()
        .store
        .get_str(keys::RULES)
        .filter(|rules| !rules.trim().is_empty())
        .unwrap_or_else(|| "No rules have been set yet.".to_string());
    let embed = serenity::CreateEmbed::new()
        .title("📜 Server Rules")
        .description(truncate_string(&rules, EMBED_DESCRIPTION_LIMIT))
        .color(colors::INFO);
    send_embed(ctx, embed).await
}

/// Numbered markdown links, one per line.
pub fn vote_description(links: &[String]) -> String {
    if links.is_empty() {
        return "No voting links are configured.".to_string();
    }
    links
        .iter()
        .enumerate()
        .map(|(i, url)| format!("**Vote #{}:** [Click Here]({url})", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
