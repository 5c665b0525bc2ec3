//! Server-side dashboard sessions keyed by random cookie tokens.

use axum::http::{header::COOKIE, HeaderMap};
use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "darkage_session";

/// How long a login stays valid.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// How long a started Discord login may take to come back.
const OAUTH_STATE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct Session {
    user: String,
    created_at: Instant,
}

/// Logged-in dashboard users and pending Discord logins.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
    oauth_states: DashMap<Uuid, Instant>,
    ttl: Duration,
}

impl SessionStore {
    /// Store whose sessions last [`SESSION_TTL`].
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    /// Store whose sessions last `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            oauth_states: DashMap::new(),
            ttl,
        }
    }

    /// Opens a session for `user` and returns its token.
    pub fn create(&self, user: impl Into<String>) -> Uuid {
        self.purge_expired();
        let token = Uuid::new_v4();
        self.sessions.insert(
            token,
            Session {
                user: user.into(),
                created_at: Instant::now(),
            },
        );
        token
    }

    /// User owning a live session.
    pub fn user(&self, token: Uuid) -> Option<String> {
        let expired = match self.sessions.get(&token) {
            Some(session) if session.created_at.elapsed() < self.ttl => {
                return Some(session.user.clone())
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.sessions.remove(&token);
        }
        None
    }

    /// User of the session named by the request cookies.
    pub fn user_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        token_from_headers(headers).and_then(|token| self.user(token))
    }

    /// Ends a session.
    pub fn remove(&self, token: Uuid) {
        self.sessions.remove(&token);
    }

    /// Number of stored sessions, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is stored.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Records a Discord login attempt and returns its `state` value.
    pub fn begin_oauth(&self) -> Uuid {
        self.oauth_states
            .retain(|_, started| started.elapsed() < OAUTH_STATE_TTL);
        let state = Uuid::new_v4();
        self.oauth_states.insert(state, Instant::now());
        state
    }

    /// Consumes a `state` value; true when it belongs to a recent login.
    pub fn finish_oauth(&self, state: &str) -> bool {
        Uuid::parse_str(state)
            .ok()
            .and_then(|state| self.oauth_states.remove(&state))
            .is_some_and(|(_, started)| started.elapsed() < OAUTH_STATE_TTL)
    }

    fn purge_expired(&self) {
        let ttl = self.ttl;
        self.sessions
            .retain(|_, session| session.created_at.elapsed() < ttl);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Session token carried by the request cookies.
pub fn token_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, token)| Uuid::parse_str(token.trim()).ok())
}

/// `Set-Cookie` value storing `token`.
pub fn session_cookie(token: Uuid) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_TTL.as_secs()
    )
}

/// `Set-Cookie` value deleting the session cookie.
pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_create_and_lookup() {
        let store = SessionStore::new();
        let token = store.create("admin");

        assert_eq!(store.user(token).as_deref(), Some("admin"));
        assert_eq!(store.user(Uuid::new_v4()), None);

        store.remove(token);
        assert_eq!(store.user(token), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_sessions_are_dropped() {
        let store = SessionStore::with_ttl(Duration::ZERO);
        let token = store.create("admin");

        assert_eq!(store.user(token), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_token_from_cookie_header() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={token}; other=1")).unwrap(),
        );
        assert_eq!(token_from_headers(&headers), Some(token));

        let mut garbage = HeaderMap::new();
        garbage.insert(COOKIE, HeaderValue::from_static("darkage_session=not-a-uuid"));
        assert_eq!(token_from_headers(&garbage), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_oauth_state_is_single_use() {
        let store = SessionStore::new();
        let state = store.begin_oauth().to_string();

        assert!(store.finish_oauth(&state));
        assert!(!store.finish_oauth(&state));
        assert!(!store.finish_oauth("forged"));
    }

    #[test]
    fn test_cookies() {
        let token = Uuid::new_v4();
        let cookie = session_cookie(token);
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}={token};")));
        assert!(cookie.contains("HttpOnly"));
        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
