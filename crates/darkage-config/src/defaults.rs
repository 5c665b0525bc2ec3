//! Built-in default values.

use crate::schema::{DashboardSettings, DiscordSettings, PathSettings, Settings};
use crate::value::{ConfigDocument, ConfigValue};
use once_cell::sync::Lazy;

/// Commands whose enable flag lives under `commands.*`.
pub const TOGGLEABLE_COMMANDS: [&str; 11] = [
    "ip", "status", "players", "version", "ping", "vote", "website", "store", "rules", "help",
    "motd",
];

static DEFAULT_DOCUMENT: Lazy<ConfigDocument> = Lazy::new(build_default_document);

/// The document every load is merged against.
///
/// Defines every key the bot recognizes together with its fallback value.
pub fn default_document() -> &'static ConfigDocument {
    &DEFAULT_DOCUMENT
}

fn build_default_document() -> ConfigDocument {
    ConfigDocument::from_iter([
        (
            "minecraft",
            ConfigValue::map([
                ("ip", ConfigValue::from("darkagesmp.enderman.cloud")),
                ("port", ConfigValue::Integer(31938)),
            ]),
        ),
        (
            "links",
            ConfigValue::map([
                ("website", ConfigValue::from("https://darkagesmp.com")),
                ("store", ConfigValue::from("https://store.darkagesmp.com")),
                (
                    "vote",
                    ConfigValue::from(vec![
                        "https://topg.org/minecraft-servers/server-123456",
                        "https://minecraft-server-list.com/server/123456",
                    ]),
                ),
            ]),
        ),
        (
            "rules",
            ConfigValue::from("1. No griefing\n2. No hacking\n3. Be respectful"),
        ),
        (
            "welcome",
            ConfigValue::map([
                ("enabled", ConfigValue::Bool(true)),
                ("channel_id", ConfigValue::Integer(0)),
                ("message", ConfigValue::from("Welcome {user} to DarkAge SMP!")),
            ]),
        ),
        (
            "commands",
            ConfigValue::map(
                TOGGLEABLE_COMMANDS
                    .iter()
                    .map(|name| (*name, ConfigValue::Bool(true))),
            ),
        ),
    ])
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            discord: DiscordSettings::default(),
            dashboard: DashboardSettings::default(),
            paths: PathSettings::default(),
        }
    }
}

impl Default for DiscordSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            owner_id: None,
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            admin_password: "admin".to_string(),
            oauth: None,
        }
    }
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            config_path: "config.json".into(),
            content_dir: ".".into(),
        }
    }
}
