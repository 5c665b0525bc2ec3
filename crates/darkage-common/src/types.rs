//! Common type definitions and newtype wrappers for domain modeling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Discord channel ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl ChannelId {
    /// Interprets an integer read from the config document.
    ///
    /// Zero and negative values mean "not configured".
    pub fn from_config(raw: i64) -> Option<Self> {
        u64::try_from(raw).ok().filter(|id| *id > 0).map(Self)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Discord user ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A Minecraft server address as stored under `minecraft.*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerAddress {
    /// Host name or IP.
    pub host: String,
    /// Port number.
    pub port: u16,
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Common result type for the application.
pub type Result<T> = std::result::Result<T, DarkageError>;

/// Error shared by the library crates.
#[derive(thiserror::Error, Debug)]
pub enum DarkageError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content file error.
    #[error("Content error: {0}")]
    Content(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
