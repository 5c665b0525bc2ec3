//! Shared configuration store with lock-free reads and serialized writes.

use crate::defaults::default_document;
use crate::error::ConfigError;
use crate::keys;
use crate::loader;
use crate::value::{ConfigDocument, ConfigValue};
use arc_swap::ArcSwap;
use darkage_common::{ChannelId, ServerAddress};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// How a call to [`ConfigStore::load`] ended up with its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file parsed; `filled` keys were added from the defaults.
    Loaded {
        /// Number of default values injected by the merge.
        filled: usize,
    },
    /// There was no file, the defaults were written out.
    Recreated,
    /// The file could not be read or parsed and was replaced by the defaults.
    Recovered,
}

/// Process-wide configuration document mirrored to a JSON file.
///
/// Reads never block and never fail: a missing key resolves to the caller's
/// default. Writes update memory first and then persist the whole document
/// under a single guard, so concurrent writers land on disk in the order they
/// acquire it and the last one wins.
pub struct ConfigStore {
    path: PathBuf,
    document: ArcSwap<ConfigDocument>,
    write_guard: Mutex<()>,
}

impl ConfigStore {
    /// Creates a store for `path` and loads it.
    ///
    /// Must run before anything reads from or writes to the store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self {
            path: path.into(),
            document: ArcSwap::from_pointee(default_document().clone()),
            write_guard: Mutex::new(()),
        };
        let outcome = store.load();
        info!(path = %store.path.display(), ?outcome, "Configuration store ready");
        store
    }

    /// Canonical file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory document with the file contents.
    ///
    /// A missing or unreadable file is replaced by the defaults; a readable
    /// one is merged against them. Any repair is written back synchronously.
    pub fn load(&self) -> LoadOutcome {
        match loader::read_document(&self.path) {
            Ok(Some(mut document)) => {
                let filled = document.merge_defaults(default_document());
                if filled > 0 {
                    info!(filled, "Config schema updated with missing keys");
                    self.persist_sync(&document);
                }
                self.document.store(Arc::new(document));
                LoadOutcome::Loaded { filled }
            }
            Ok(None) => {
                info!(path = %self.path.display(), "Config file not found, creating default config");
                self.install_defaults();
                LoadOutcome::Recreated
            }
            Err(e) => {
                error!(error = %e, "Error loading config, using defaults");
                self.install_defaults();
                LoadOutcome::Recovered
            }
        }
    }

    /// Discards the in-memory document and loads the file again.
    pub fn reload(&self) -> LoadOutcome {
        info!(path = %self.path.display(), "Reloading configuration from disk");
        self.load()
    }

    /// Value at a dot path, `None` when missing or `null`.
    pub fn get(&self, path: &str) -> Option<ConfigValue> {
        self.document.load().get(path).cloned()
    }

    /// Value at a dot path, or `default` when missing or `null`.
    pub fn get_or(&self, path: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        self.get(path).unwrap_or_else(|| default.into())
    }

    /// String at a dot path.
    pub fn get_str(&self, path: &str) -> Option<String> {
        self.document
            .load()
            .get(path)
            .and_then(ConfigValue::as_str)
            .map(ToString::to_string)
    }

    /// Integer at a dot path.
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.document.load().get(path).and_then(ConfigValue::as_i64)
    }

    /// Boolean at a dot path.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.document.load().get(path).and_then(ConfigValue::as_bool)
    }

    /// List of strings at a dot path.
    pub fn get_list(&self, path: &str) -> Option<Vec<String>> {
        self.document
            .load()
            .get(path)
            .and_then(ConfigValue::as_string_list)
    }

    /// Read-only view of the whole current document.
    pub fn snapshot(&self) -> Arc<ConfigDocument> {
        self.document.load_full()
    }

    /// Assigns a value at a dot path and persists the document.
    ///
    /// Returns once the write has finished. A failed write is logged and
    /// leaves the new value in memory only.
    pub async fn set(&self, path: &str, value: impl Into<ConfigValue>) {
        let value = value.into();
        self.document.rcu(|current| {
            let mut next = ConfigDocument::clone(current);
            next.set(path, value.clone());
            next
        });
        debug!(path, "Config value updated");

        if let Err(e) = self.persist().await {
            error!(error = %e, "Failed to save config");
        }
    }

    /// Writes the current document to disk under the write guard.
    ///
    /// The document is captured after the guard is acquired.
    pub async fn persist(&self) -> Result<(), ConfigError> {
        let _guard = self.write_guard.lock().await;
        let snapshot = self.document.load_full();
        let path = self.path.clone();

        match tokio::task::spawn_blocking(move || loader::save_document(&path, &snapshot)).await {
            Ok(result) => result,
            Err(e) => Err(ConfigError::WriteFailed {
                path: self.path.clone(),
                source: std::io::Error::other(e),
            }),
        }
    }

    /// Game server address, falling back to the defaults.
    pub fn server_address(&self) -> ServerAddress {
        let defaults = default_document();
        let host = self
            .get_str(keys::MINECRAFT_IP)
            .or_else(|| defaults.get(keys::MINECRAFT_IP).and_then(ConfigValue::as_str).map(ToString::to_string))
            .unwrap_or_default();
        let port_at = |value: Option<&ConfigValue>| {
            value
                .and_then(ConfigValue::as_i64)
                .and_then(|port| u16::try_from(port).ok())
        };
        let port = port_at(self.document.load().get(keys::MINECRAFT_PORT))
            .or_else(|| port_at(defaults.get(keys::MINECRAFT_PORT)))
            .unwrap_or_default();
        ServerAddress { host, port }
    }

    /// Whether a command is enabled; commands without a flag are enabled.
    pub fn is_command_enabled(&self, command: &str) -> bool {
        self.get_bool(&keys::command_flag(command)).unwrap_or(true)
    }

    /// Welcome channel, if welcomes are enabled and a channel is set.
    pub fn welcome_channel(&self) -> Option<ChannelId> {
        if !self.get_bool(keys::WELCOME_ENABLED).unwrap_or(false) {
            return None;
        }
        let channel = self.get_i64(keys::WELCOME_CHANNEL_ID).and_then(ChannelId::from_config);
        if channel.is_none() {
            warn!("Welcome messages are enabled but no channel is configured");
        }
        channel
    }

    fn install_defaults(&self) {
        let document = default_document().clone();
        self.persist_sync(&document);
        self.document.store(Arc::new(document));
    }

    fn persist_sync(&self, document: &ConfigDocument) {
        match loader::save_document(&self.path, document) {
            Ok(()) => info!(path = %self.path.display(), "Config saved successfully"),
            Err(e) => error!(error = %e, "Failed to save config"),
        }
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("path", &self.path)
            .field("keys", &self.document.load().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkage_common::test_utils::{config_fixtures, init_test_logging};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::open(dir.path().join("config.json"))
    }

    #[test]
    fn test_open_without_file_recreates_defaults() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.path().exists());
        assert_eq!(store.snapshot().as_ref(), default_document());
        assert_eq!(store.load(), LoadOutcome::Loaded { filled: 0 });
    }

    #[test]
    fn test_load_reports_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::open(&path);

        std::fs::remove_file(&path).unwrap();
        assert_eq!(store.load(), LoadOutcome::Recreated);

        std::fs::write(&path, config_fixtures::corrupt_config_json()).unwrap();
        assert_eq!(store.load(), LoadOutcome::Recovered);

        std::fs::write(&path, config_fixtures::partial_config_json()).unwrap();
        assert!(matches!(store.load(), LoadOutcome::Loaded { filled } if filled > 0));
    }

    #[test]
    fn test_load_repair_keeps_large_integers_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"welcome": {"channel_id": 18446744073709551615}}"#).unwrap();

        let store = ConfigStore::open(&path);

        assert_eq!(store.get(keys::WELCOME_CHANNEL_ID), Some(ConfigValue::UInt(u64::MAX)));
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("\"channel_id\": 18446744073709551615"), "{on_disk}");
        assert_eq!(store.welcome_channel(), None);
    }

    #[test]
    fn test_get_missing_path_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.get("x.y.z"), None);
        assert_eq!(store.get_or("x.y.z", "fallback"), ConfigValue::from("fallback"));
        assert_eq!(store.get_or("minecraft.ip.deeper", 7), ConfigValue::Integer(7));
    }

    #[test]
    fn test_typed_getters_do_not_coerce() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.get_i64(keys::MINECRAFT_PORT), Some(31938));
        assert_eq!(store.get_str(keys::MINECRAFT_PORT), None);
        assert_eq!(store.get_bool(keys::MINECRAFT_IP), None);
    }

    #[tokio::test]
    async fn test_set_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set("welcome.channel_id", 42).await;

        assert_eq!(store.get_i64(keys::WELCOME_CHANNEL_ID), Some(42));
        let on_disk = loader::read_document(store.path()).unwrap().unwrap();
        assert_eq!(
            on_disk.get(keys::WELCOME_CHANNEL_ID).and_then(ConfigValue::as_i64),
            Some(42)
        );
    }

    #[tokio::test]
    async fn test_set_failure_keeps_memory_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::open(dir.path().join("gone").join("config.json"));

        store.set(keys::RULES, "Only in memory").await;

        assert_eq!(store.get_str(keys::RULES).as_deref(), Some("Only in memory"));
        assert!(matches!(store.persist().await, Err(ConfigError::WriteFailed { .. })));
    }

    #[tokio::test]
    async fn test_server_address_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.server_address().to_string(), "darkagesmp.enderman.cloud:31938");
        store.set(keys::MINECRAFT_PORT, "broken").await;
        assert_eq!(store.server_address().port, 31938);
        store.set(keys::MINECRAFT_PORT, 70_000).await;
        assert_eq!(store.server_address().port, 31938);
        store.set(keys::MINECRAFT_PORT, -1).await;
        assert_eq!(store.server_address().port, 31938);

        assert!(store.is_command_enabled("status"));
        assert!(store.is_command_enabled("unknown"));
        store.set(&keys::command_flag("status"), false).await;
        assert!(!store.is_command_enabled("status"));
    }

    #[tokio::test]
    async fn test_welcome_channel() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.welcome_channel(), None);
        store.set(keys::WELCOME_CHANNEL_ID, 1234).await;
        assert_eq!(store.welcome_channel(), Some(ChannelId(1234)));
        store.set(keys::WELCOME_ENABLED, false).await;
        assert_eq!(store.welcome_channel(), None);
    }
}
