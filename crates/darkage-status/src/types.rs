//! Response types of the mcsrvstat.us v3 API.

use serde::Deserialize;

/// Status report for one server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerStatus {
    /// Whether the server answered the ping.
    #[serde(default)]
    pub online: bool,
    /// Player counts and names.
    #[serde(default)]
    pub players: Players,
    /// Server version string.
    #[serde(default)]
    pub version: Option<String>,
    /// Message of the day.
    #[serde(default)]
    pub motd: Option<Motd>,
}

/// Player counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Players {
    /// Players currently online.
    #[serde(default)]
    pub online: u32,
    /// Player slots.
    #[serde(default)]
    pub max: u32,
    /// Online players, when the server exposes them.
    #[serde(default)]
    pub list: Vec<PlayerEntry>,
}

/// One entry of the player list.
///
/// Java servers report `{ "name", "uuid" }` objects, older responses plain names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PlayerEntry {
    /// Bare player name.
    Name(String),
    /// Player profile.
    Profile {
        /// Player name.
        name: String,
    },
}

impl PlayerEntry {
    /// Player name.
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Profile { name } => name,
        }
    }
}

/// Message of the day in its different renderings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Motd {
    /// Lines with formatting codes stripped.
    #[serde(default)]
    pub clean: Vec<String>,
}

impl ServerStatus {
    /// Version string, or `Unknown`.
    pub fn version_or_unknown(&self) -> &str {
        self.version.as_deref().unwrap_or("Unknown")
    }

    /// First clean MOTD line, or `No MOTD`.
    pub fn motd_line(&self) -> &str {
        self.motd
            .as_ref()
            .and_then(|motd| motd.clean.first())
            .map_or("No MOTD", String::as_str)
    }

    /// Names of the players online.
    pub fn player_names(&self) -> Vec<&str> {
        self.players.list.iter().map(PlayerEntry::name).collect()
    }
}
