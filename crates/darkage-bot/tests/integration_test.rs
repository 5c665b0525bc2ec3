//! Integration tests for the dashboard router.
//!
//! Requests go straight into the router; a local axum server stands in for
//! Discord's OAuth endpoints.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use darkage_bot::dashboard::{self, DashboardState, DiscordOAuth};
use darkage_common::test_utils::{config_path_in, create_temp_dir, init_test_logging};
use darkage_common::UserId;
use darkage_config::{keys, read_document, ConfigStore, ConfigValue, OAuthSettings};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const PASSWORD: &str = "correct horse";

struct Harness {
    _dir: TempDir,
    store: Arc<ConfigStore>,
    app: Router,
}

fn harness(oauth: Option<DiscordOAuth>) -> Harness {
    init_test_logging();
    let dir = create_temp_dir();
    let store = Arc::new(ConfigStore::open(config_path_in(&dir)));
    let state = DashboardState::with_oauth(Arc::clone(&store), PASSWORD, oauth, Some(UserId(42)));
    Harness {
        _dir: dir,
        store,
        app: dashboard::router(state),
    }
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn form_request(uri: &str, cookie: Option<&str>, fields: &[(&str, &str)]) -> Request<Body> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// `name=value` part of the `Set-Cookie` header.
fn cookie_pair(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn login(app: &Router) -> String {
    let response = send(app, form_request("/login", None, &[("password", PASSWORD)])).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    cookie_pair(&response)
}

#[tokio::test]
async fn test_health() {
    let h = harness(None);
    let response = send(&h.app, get_request("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn test_index_requires_login() {
    let h = harness(None);

    let response = send(&h.app, get_request("/", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = send(&h.app, get_request("/", Some("darkage_session=0b8e8b51-6a8a-4a59-9a41-6d1f0a5c1b7e"))).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_password_login() {
    let h = harness(None);

    let response = send(&h.app, form_request("/login", None, &[("password", "wrong")])).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(response).await.contains("Invalid password"));

    let cookie = login(&h.app).await;
    assert!(cookie.starts_with("darkage_session="));

    let response = send(&h.app, get_request("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("darkagesmp.enderman.cloud"));
    assert!(!page.contains("/oauth/login"));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let h = harness(None);
    let cookie = login(&h.app).await;

    let response = send(&h.app, get_request("/logout", Some(&cookie))).await;
    assert_eq!(location(&response), "/login");
    assert!(response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("Max-Age=0")));

    let response = send(&h.app, get_request("/", Some(&cookie))).await;
    assert_eq!(location(&response), "/login");
}

fn update_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("minecraft_ip", "play.example.net"),
        ("minecraft_port", "19132"),
        ("link_website", "https://example.net"),
        ("link_store", "https://store.example.net"),
        ("link_vote", "https://vote-a.example\nhttps://vote-b.example\n"),
        ("rules", "Be kind"),
        ("welcome_enabled", "true"),
        ("welcome_channel_id", "987654321"),
        ("welcome_message", "Hello {user}!"),
        ("cmd_status", "true"),
        ("cmd_ip", "true"),
    ]
}

#[tokio::test]
async fn test_config_update_writes_store_and_file() {
    let h = harness(None);
    let cookie = login(&h.app).await;

    let response = send(&h.app, form_request("/config/update", Some(&cookie), &update_fields())).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/?saved=1");

    assert_eq!(h.store.get_str(keys::MINECRAFT_IP).as_deref(), Some("play.example.net"));
    assert_eq!(h.store.get_i64(keys::MINECRAFT_PORT), Some(19132));
    assert_eq!(
        h.store.get_list(keys::LINK_VOTE),
        Some(vec!["https://vote-a.example".to_string(), "https://vote-b.example".to_string()])
    );
    assert_eq!(h.store.get_i64(keys::WELCOME_CHANNEL_ID), Some(987_654_321));
    assert!(h.store.is_command_enabled("status"));
    assert!(h.store.is_command_enabled("ip"));
    assert!(!h.store.is_command_enabled("ping"));
    assert!(!h.store.is_command_enabled("motd"));

    let on_disk = read_document(h.store.path()).unwrap().unwrap();
    assert_eq!(on_disk, *h.store.snapshot());

    let response = send(&h.app, get_request("/?saved=1", Some(&cookie))).await;
    assert!(body_text(response).await.contains("Configuration saved."));
}

#[tokio::test]
async fn test_config_update_requires_login() {
    let h = harness(None);
    let before = h.store.snapshot();

    let response = send(&h.app, form_request("/config/update", None, &update_fields())).await;

    assert_eq!(location(&response), "/login");
    assert_eq!(h.store.snapshot(), before);
}

#[tokio::test]
async fn test_config_update_rejects_bad_port() {
    let h = harness(None);
    let cookie = login(&h.app).await;
    let mut fields = update_fields();
    fields[1] = ("minecraft_port", "not-a-port");

    let response = send(&h.app, form_request("/config/update", Some(&cookie), &fields)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(h.store.get(keys::MINECRAFT_IP), Some(ConfigValue::from("darkagesmp.enderman.cloud")));
}

#[tokio::test]
async fn test_oauth_routes_without_configuration() {
    let h = harness(None);

    let response = send(&h.app, get_request("/oauth/login", None)).await;
    assert_eq!(location(&response), "/login");

    let response = send(&h.app, get_request("/oauth/callback?code=x&state=y", None)).await;
    assert_eq!(location(&response), "/login");
}

async fn spawn_discord(user_id: &'static str) -> String {
    let app = Router::new()
        .route(
            "/api/oauth2/token",
            post(|| async { Json(serde_json::json!({ "access_token": "token", "token_type": "Bearer" })) }),
        )
        .route(
            "/api/users/@me",
            get(move |headers: axum::http::HeaderMap| async move {
                let authorized = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer token");
                if authorized {
                    Ok(Json(serde_json::json!({ "id": user_id, "username": "someone" })))
                } else {
                    Err(StatusCode::UNAUTHORIZED)
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn oauth_settings() -> OAuthSettings {
    OAuthSettings {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://localhost/oauth/callback".to_string(),
    }
}

async fn begin_oauth(app: &Router) -> String {
    let response = send(app, get_request("/oauth/login", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let authorize = url::Url::parse(location(&response)).unwrap();
    assert_eq!(authorize.path(), "/api/oauth2/authorize");
    authorize
        .query_pairs()
        .find(|(name, _)| name == "state")
        .map(|(_, value)| value.into_owned())
        .unwrap()
}

#[tokio::test]
async fn test_oauth_owner_is_admitted() {
    let api = spawn_discord("42").await;
    let h = harness(Some(DiscordOAuth::with_api_base(oauth_settings(), api).unwrap()));

    let login_page = send(&h.app, get_request("/login", None)).await;
    assert!(body_text(login_page).await.contains("/oauth/login"));

    let state = begin_oauth(&h.app).await;
    let response = send(&h.app, get_request(&format!("/oauth/callback?code=abc&state={state}"), None)).await;
    assert_eq!(location(&response), "/");
    let cookie = cookie_pair(&response);

    let response = send(&h.app, get_request("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("someone"));
}

#[tokio::test]
async fn test_oauth_other_account_is_rejected() {
    let api = spawn_discord("7").await;
    let h = harness(Some(DiscordOAuth::with_api_base(oauth_settings(), api).unwrap()));

    let state = begin_oauth(&h.app).await;
    let response = send(&h.app, get_request(&format!("/oauth/callback?code=abc&state={state}"), None)).await;

    assert_eq!(location(&response), "/login?error=unauthorized");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_oauth_unknown_state_is_rejected() {
    let api = spawn_discord("42").await;
    let h = harness(Some(DiscordOAuth::with_api_base(oauth_settings(), api).unwrap()));

    let response = send(&h.app, get_request("/oauth/callback?code=abc&state=forged", None)).await;
    assert_eq!(location(&response), "/login?error=oauth_failed");

    let response = send(&h.app, get_request("/login?error=oauth_failed", None)).await;
    assert!(body_text(response).await.contains("Discord login failed"));
}
