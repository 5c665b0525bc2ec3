//! Process settings read from the environment at startup.

use darkage_common::{DarkageError, UserId};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable names.
pub mod env {
    /// Discord bot token.
    pub const DISCORD_TOKEN: &str = "DISCORD_TOKEN";
    /// Discord user allowed to log into the dashboard through OAuth.
    pub const OWNER_ID: &str = "OWNER_ID";
    /// Path of the JSON config document.
    pub const CONFIG_PATH: &str = "CONFIG_PATH";
    /// Directory holding `info.md`, `notice.md` and `players.md`.
    pub const CONTENT_DIR: &str = "CONTENT_DIR";
    /// Set to `false` to skip the web dashboard.
    pub const DASHBOARD_ENABLED: &str = "DASHBOARD_ENABLED";
    /// Dashboard bind address.
    pub const DASHBOARD_BIND: &str = "DASHBOARD_BIND";
    /// Dashboard port.
    pub const PORT: &str = "PORT";
    /// Dashboard password.
    pub const ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
    /// OAuth application id.
    pub const DISCORD_CLIENT_ID: &str = "DISCORD_CLIENT_ID";
    /// OAuth application secret.
    pub const DISCORD_CLIENT_SECRET: &str = "DISCORD_CLIENT_SECRET";
    /// OAuth redirect URI registered with Discord.
    pub const DISCORD_REDIRECT_URI: &str = "DISCORD_REDIRECT_URI";
}

/// Top-level process settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Discord connection settings.
    pub discord: DiscordSettings,
    /// Web dashboard settings.
    pub dashboard: DashboardSettings,
    /// File locations.
    pub paths: PathSettings,
}

/// Discord connection settings.
#[derive(Clone)]
pub struct DiscordSettings {
    /// Bot token.
    pub token: String,
    /// Owner account, the only one admitted through OAuth.
    pub owner_id: Option<UserId>,
}

/// Web dashboard settings.
#[derive(Clone)]
pub struct DashboardSettings {
    /// Whether the dashboard listener is started.
    pub enabled: bool,
    /// Address to bind.
    pub bind_address: String,
    /// Port to bind.
    pub port: u16,
    /// Password accepted by the login form.
    pub admin_password: String,
    /// OAuth settings, present only when fully configured.
    pub oauth: Option<OAuthSettings>,
}

/// Discord OAuth application settings.
#[derive(Clone)]
pub struct OAuthSettings {
    /// Application id.
    pub client_id: String,
    /// Application secret.
    pub client_secret: String,
    /// Redirect URI.
    pub redirect_uri: String,
}

/// File locations.
#[derive(Debug, Clone)]
pub struct PathSettings {
    /// JSON config document.
    pub config_path: PathBuf,
    /// Directory of markdown content files.
    pub content_dir: PathBuf,
}

impl Settings {
    /// Reads settings from the process environment, then from the
    /// `KEY=value` file at `env_file`.
    ///
    /// Process variables win over the file. A missing file is not an error.
    pub fn from_env(env_file: impl AsRef<Path>) -> Result<Self, DarkageError> {
        let file = read_env_file(env_file.as_ref())?;
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    /// Reads settings through `lookup`, starting from the defaults.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DarkageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        if let Some(token) = var(env::DISCORD_TOKEN) {
            settings.discord.token = token;
        }
        if let Some(owner) = var(env::OWNER_ID) {
            let owner = owner
                .parse()
                .map_err(|e| DarkageError::Config(format!("{} is not a user id: {e}", env::OWNER_ID)))?;
            settings.discord.owner_id = Some(owner);
        }

        if let Some(path) = var(env::CONFIG_PATH) {
            settings.paths.config_path = path.into();
        }
        if let Some(dir) = var(env::CONTENT_DIR) {
            settings.paths.content_dir = dir.into();
        }

        if let Some(enabled) = var(env::DASHBOARD_ENABLED) {
            settings.dashboard.enabled = !matches!(enabled.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off");
        }
        if let Some(bind) = var(env::DASHBOARD_BIND) {
            settings.dashboard.bind_address = bind;
        }
        if let Some(port) = var(env::PORT) {
            settings.dashboard.port = port
                .parse()
                .map_err(|e| DarkageError::Config(format!("{} is not a port: {e}", env::PORT)))?;
        }
        if let Some(password) = var(env::ADMIN_PASSWORD) {
            settings.dashboard.admin_password = password;
        }

        settings.dashboard.oauth = match (
            var(env::DISCORD_CLIENT_ID),
            var(env::DISCORD_CLIENT_SECRET),
            var(env::DISCORD_REDIRECT_URI),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(OAuthSettings {
                client_id,
                client_secret,
                redirect_uri,
            }),
            _ => None,
        };

        Ok(settings)
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<(), DarkageError> {
        if self.discord.token.is_empty() {
            return Err(DarkageError::Config(
                "Discord token cannot be empty".to_string(),
            ));
        }

        if self.dashboard.enabled && self.dashboard.port == 0 {
            return Err(DarkageError::Config(
                "Dashboard port cannot be zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, DarkageError> {
    let invalid = |e: dotenvy::Error| DarkageError::Config(format!("{} is not a valid env file: {e}", path.display()));
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(invalid(e)),
    };
    let vars = entries.collect::<Result<HashMap<_, _>, _>>().map_err(invalid)?;
    debug!(path = %path.display(), count = vars.len(), "Read environment file");
    Ok(vars)
}

impl DashboardSettings {
    /// `host:port` string to bind the listener to.
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl fmt::Debug for DiscordSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordSettings")
            .field("token", &"<redacted>")
            .field("owner_id", &self.owner_id)
            .finish()
    }
}

impl fmt::Debug for DashboardSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardSettings")
            .field("enabled", &self.enabled)
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("admin_password", &"<redacted>")
            .field("oauth", &self.oauth)
            .finish()
    }
}

impl fmt::Debug for OAuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}
