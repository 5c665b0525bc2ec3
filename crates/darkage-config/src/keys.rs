//! Dot paths of the settings the bot reads.

/// Minecraft server host.
pub const MINECRAFT_IP: &str = "minecraft.ip";
/// Minecraft server port.
pub const MINECRAFT_PORT: &str = "minecraft.port";
/// Website link.
pub const LINK_WEBSITE: &str = "links.website";
/// Store link.
pub const LINK_STORE: &str = "links.store";
/// Voting site links.
pub const LINK_VOTE: &str = "links.vote";
/// Server rules text.
pub const RULES: &str = "rules";
/// Whether new members get a welcome message.
pub const WELCOME_ENABLED: &str = "welcome.enabled";
/// Channel the welcome message goes to.
pub const WELCOME_CHANNEL_ID: &str = "welcome.channel_id";
/// Welcome message template, `{user}` is replaced by a mention.
pub const WELCOME_MESSAGE: &str = "welcome.message";
/// Map of per-command enable flags.
pub const COMMANDS: &str = "commands";

/// Dot path of the enable flag for one command.
pub fn command_flag(command: &str) -> String {
    format!("{COMMANDS}.{command}")
}
