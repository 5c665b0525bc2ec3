//! Discord OAuth2 authorization-code login for the dashboard.

use crate::error::DashboardError;
use darkage_config::OAuthSettings;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Discord REST API root.
pub const DISCORD_API_BASE: &str = "https://discord.com/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Discord account returned by `/users/@me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscordUser {
    /// Snowflake id.
    pub id: String,
    /// Account name.
    pub username: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for the OAuth endpoints of one Discord application.
#[derive(Debug, Clone)]
pub struct DiscordOAuth {
    client: reqwest::Client,
    settings: OAuthSettings,
    api_base: String,
}

impl DiscordOAuth {
    /// Client against the public Discord API.
    pub fn new(settings: OAuthSettings) -> Result<Self, DashboardError> {
        Self::with_api_base(settings, DISCORD_API_BASE)
    }

    /// Client against another API root.
    pub fn with_api_base(
        settings: OAuthSettings,
        api_base: impl Into<String>,
    ) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            settings,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Page on Discord that asks the user to authorize the application.
    pub fn authorize_url(&self, state: &str) -> Result<Url, DashboardError> {
        Ok(Url::parse_with_params(
            &format!("{}/oauth2/authorize", self.api_base),
            &[
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "identify"),
                ("state", state),
            ],
        )?)
    }

    /// Trades an authorization code for the account that granted it.
    pub async fn login(&self, code: &str) -> Result<DiscordUser, DashboardError> {
        let access_token = self.exchange_code(code).await?;
        self.fetch_user(&access_token).await
    }

    async fn exchange_code(&self, code: &str) -> Result<String, DashboardError> {
        let response = self
            .client
            .post(format!("{}/oauth2/token", self.api_base))
            .form(&[
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DashboardError::Rejected(response.status().as_u16()));
        }
        let token: TokenResponse = response.json().await?;
        debug!("Exchanged OAuth code for an access token");
        Ok(token.access_token)
    }

    async fn fetch_user(&self, access_token: &str) -> Result<DiscordUser, DashboardError> {
        let response = self
            .client
            .get(format!("{}/users/@me", self.api_base))
            .bearer_auth(access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DashboardError::Rejected(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}
