//! Application-wide error types using thiserror.

use darkage_common::DarkageError;
use poise::serenity_prelude as serenity;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] DarkageError),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// Status client could not be built.
    #[error("Status client error: {0}")]
    Status(#[from] darkage_status::StatusError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;

/// Failures of the dashboard's Discord login.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    /// Request to Discord failed.
    #[error("Discord request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Discord answered with a non-success status.
    #[error("Discord rejected the request with status {0}")]
    Rejected(u16),

    /// OAuth endpoint URL could not be built.
    #[error("Invalid OAuth URL: {0}")]
    Url(#[from] url::ParseError),
}
