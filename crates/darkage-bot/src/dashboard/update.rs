//! Parsing and applying the config editor form.

use darkage_common::non_empty_lines;
use darkage_config::{keys, ConfigStore, ConfigValue};
use std::collections::HashMap;
use tracing::info;

/// Prefix of the per-command checkbox fields.
pub const COMMAND_FIELD_PREFIX: &str = "cmd_";

/// Values submitted by the config editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigUpdate {
    /// Game server host.
    pub minecraft_ip: String,
    /// Game server port.
    pub minecraft_port: u16,
    /// Website link.
    pub link_website: String,
    /// Store link.
    pub link_store: String,
    /// Voting links.
    pub link_vote: Vec<String>,
    /// Rules text.
    pub rules: String,
    /// Whether welcome messages are sent.
    pub welcome_enabled: bool,
    /// Welcome channel, `0` for none.
    pub welcome_channel_id: i64,
    /// Welcome template.
    pub welcome_message: String,
    /// Checked command checkboxes, without the prefix.
    pub enabled_commands: Vec<String>,
}

impl ConfigUpdate {
    /// Reads the submitted form fields.
    ///
    /// Unchecked checkboxes are absent from a form submission, so a missing
    /// `welcome_enabled` or `cmd_<name>` field means off.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, String> {
        let required = |name: &str| {
            form.get(name)
                .cloned()
                .ok_or_else(|| format!("Missing field `{name}`"))
        };

        let minecraft_port = required("minecraft_port")?
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| "Port must be a number between 1 and 65535".to_string())?;

        let welcome_channel_id = match form.get("welcome_channel_id").map(|v| v.trim()) {
            None | Some("") => 0,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|id| *id >= 0)
                .ok_or_else(|| "Welcome channel ID must be a number".to_string())?,
        };

        let mut enabled_commands: Vec<String> = form
            .keys()
            .filter_map(|key| key.strip_prefix(COMMAND_FIELD_PREFIX))
            .map(ToString::to_string)
            .collect();
        enabled_commands.sort();

        Ok(Self {
            minecraft_ip: required("minecraft_ip")?.trim().to_string(),
            minecraft_port,
            link_website: required("link_website")?.trim().to_string(),
            link_store: required("link_store")?.trim().to_string(),
            link_vote: non_empty_lines(&required("link_vote")?),
            rules: required("rules")?.replace("\r\n", "\n"),
            welcome_enabled: form.contains_key("welcome_enabled"),
            welcome_channel_id,
            welcome_message: required("welcome_message")?,
            enabled_commands,
        })
    }

    /// Writes every field through the store, one `set` per key.
    ///
    /// Each command already in the document is switched on when its checkbox
    /// was submitted and off otherwise.
    pub async fn apply(self, store: &ConfigStore) {
        store.set(keys::MINECRAFT_IP, self.minecraft_ip).await;
        store.set(keys::MINECRAFT_PORT, self.minecraft_port).await;

        store.set(keys::LINK_WEBSITE, self.link_website).await;
        store.set(keys::LINK_STORE, self.link_store).await;
        store.set(keys::LINK_VOTE, self.link_vote).await;

        store.set(keys::RULES, self.rules).await;

        store.set(keys::WELCOME_ENABLED, self.welcome_enabled).await;
        store.set(keys::WELCOME_CHANNEL_ID, self.welcome_channel_id).await;
        store.set(keys::WELCOME_MESSAGE, self.welcome_message).await;

        let commands: Vec<String> = store
            .get(keys::COMMANDS)
            .as_ref()
            .and_then(ConfigValue::as_map)
            .map(|commands| commands.keys().cloned().collect())
            .unwrap_or_default();
        for name in commands {
            let enabled = self.enabled_commands.contains(&name);
            store.set(&keys::command_flag(&name), enabled).await;
        }

        info!("Configuration updated from the dashboard");
    }
}
