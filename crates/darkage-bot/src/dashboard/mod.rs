//! Web dashboard for editing the configuration document.
//!
//! Serves a password or Discord protected form over the config store and a
//! `/health` endpoint for uptime monitors.

pub mod oauth;
pub mod pages;
pub mod sessions;
pub mod update;

use crate::error::BotResult;
use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use darkage_common::UserId;
use darkage_config::{ConfigStore, DashboardSettings};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use oauth::{DiscordOAuth, DiscordUser};
pub use sessions::SessionStore;
pub use update::ConfigUpdate;

/// Shared state of the dashboard handlers.
#[derive(Clone)]
pub struct DashboardState {
    /// Configuration store being edited.
    pub store: Arc<ConfigStore>,
    /// Logged-in users.
    pub sessions: Arc<SessionStore>,
    /// Password accepted by the login form.
    admin_password: Arc<str>,
    /// Discord login, when configured.
    pub oauth: Option<Arc<DiscordOAuth>>,
    /// Only account admitted through Discord.
    pub owner_id: Option<UserId>,
}

impl DashboardState {
    /// State for `settings`. Discord login is left off if its client cannot be built.
    pub fn new(store: Arc<ConfigStore>, settings: &DashboardSettings, owner_id: Option<UserId>) -> Self {
        let oauth = settings.oauth.clone().and_then(|oauth| {
            DiscordOAuth::new(oauth)
                .map_err(|e| warn!(error = %e, "Discord login disabled"))
                .ok()
        });
        Self::with_oauth(store, &settings.admin_password, oauth, owner_id)
    }

    /// State with an explicit Discord login client.
    pub fn with_oauth(
        store: Arc<ConfigStore>,
        admin_password: &str,
        oauth: Option<DiscordOAuth>,
        owner_id: Option<UserId>,
    ) -> Self {
        Self {
            store,
            sessions: Arc::new(SessionStore::new()),
            admin_password: admin_password.into(),
            oauth: oauth.map(Arc::new),
            owner_id,
        }
    }

    fn password_matches(&self, candidate: &str) -> bool {
        let expected = self.admin_password.as_bytes();
        let candidate = candidate.as_bytes();
        expected.len() == candidate.len()
            && expected
                .iter()
                .zip(candidate)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl std::fmt::Debug for DashboardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardState")
            .field("store", &self.store)
            .field("sessions", &self.sessions.len())
            .field("oauth", &self.oauth.is_some())
            .field("owner_id", &self.owner_id)
            .finish_non_exhaustive()
    }
}

/// Builds the dashboard router.
pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", get(logout))
        .route("/config/update", post(update_config))
        .route("/oauth/login", get(oauth_login))
        .route("/oauth/callback", get(oauth_callback))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Serves the dashboard on `bind_address` until the listener fails.
pub async fn serve(state: DashboardState, bind_address: &str) -> BotResult<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!(address = %bind_address, "Dashboard listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct IndexQuery {
    saved: Option<String>,
}

async fn index(
    State(state): State<DashboardState>,
    headers: HeaderMap,
    Query(query): Query<IndexQuery>,
) -> Response {
    let Some(user) = state.sessions.user_from_headers(&headers) else {
        return Redirect::to("/login").into_response();
    };
    let document = state.store.snapshot();
    Html(pages::render_dashboard(&document, &user, query.saved.is_some())).into_response()
}

#[derive(Debug, Deserialize)]
struct LoginQuery {
    error: Option<String>,
}

async fn login_page(State(state): State<DashboardState>, Query(query): Query<LoginQuery>) -> Html<String> {
    let error = query.error.as_deref().map(|code| match code {
        "unauthorized" => "This Discord account may not manage the dashboard.",
        "oauth_failed" => "Discord login failed, please try again.",
        _ => "Login failed.",
    });
    Html(pages::render_login(error, state.oauth.is_some()))
}

#[derive(Deserialize)]
struct LoginForm {
    password: String,
}

async fn login_submit(State(state): State<DashboardState>, Form(form): Form<LoginForm>) -> Response {
    if !state.password_matches(&form.password) {
        warn!("Rejected dashboard login with a wrong password");
        let page = pages::render_login(Some("Invalid password"), state.oauth.is_some());
        return (StatusCode::UNAUTHORIZED, Html(page)).into_response();
    }

    let token = state.sessions.create("admin");
    info!("Dashboard login with password");
    (
        AppendHeaders([(SET_COOKIE, sessions::session_cookie(token))]),
        Redirect::to("/"),
    )
        .into_response()
}

async fn logout(State(state): State<DashboardState>, headers: HeaderMap) -> Response {
    if let Some(token) = sessions::token_from_headers(&headers) {
        state.sessions.remove(token);
    }
    (
        AppendHeaders([(SET_COOKIE, sessions::clear_cookie())]),
        Redirect::to("/login"),
    )
        .into_response()
}

async fn update_config(
    State(state): State<DashboardState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if state.sessions.user_from_headers(&headers).is_none() {
        return Redirect::to("/login").into_response();
    }

    match ConfigUpdate::from_form(&form) {
        Ok(update) => {
            update.apply(&state.store).await;
            Redirect::to("/?saved=1").into_response()
        }
        Err(reason) => (StatusCode::BAD_REQUEST, reason).into_response(),
    }
}

async fn oauth_login(State(state): State<DashboardState>) -> Response {
    let Some(oauth) = state.oauth.as_ref() else {
        return Redirect::to("/login").into_response();
    };
    let login_state = state.sessions.begin_oauth();
    match oauth.authorize_url(&login_state.to_string()) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            warn!(error = %e, "Could not build the Discord authorize URL");
            Redirect::to("/login?error=oauth_failed").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

async fn oauth_callback(State(state): State<DashboardState>, Query(query): Query<CallbackQuery>) -> Response {
    let Some(oauth) = state.oauth.as_ref() else {
        return Redirect::to("/login").into_response();
    };
    let (Some(code), Some(login_state)) = (query.code, query.state) else {
        return Redirect::to("/login?error=oauth_failed").into_response();
    };
    if !state.sessions.finish_oauth(&login_state) {
        warn!("Discord login with an unknown state");
        return Redirect::to("/login?error=oauth_failed").into_response();
    }

    let user = match oauth.login(&code).await {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "Discord login failed");
            return Redirect::to("/login?error=oauth_failed").into_response();
        }
    };

    let is_owner = state
        .owner_id
        .is_some_and(|owner| user.id.parse::<UserId>().is_ok_and(|id| id == owner));
    if !is_owner {
        warn!(user = %user.username, id = %user.id, "Discord account is not the owner");
        return Redirect::to("/login?error=unauthorized").into_response();
    }

    let token = state.sessions.create(user.username.clone());
    info!(user = %user.username, "Dashboard login with Discord");
    (
        AppendHeaders([(SET_COOKIE, sessions::session_cookie(token))]),
        Redirect::to("/"),
    )
        .into_response()
}
