//! Test utilities and shared test helpers for DarkAge Bot.
//!
//! Enabled through the `testing` feature so every crate's tests share the same
//! logging setup, scratch directories and config file fixtures.

use std::sync::Once;

#[cfg(feature = "tracing-subscriber")]
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Routes `tracing` output to the test harness, once per process.
///
/// `RUST_LOG` overrides the default `debug` filter.
#[cfg(feature = "tracing-subscriber")]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Without `tracing-subscriber` there is nothing to install.
#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_test_logging() {
    INIT.call_once(|| {});
}

/// Scratch directory for a config file or content files, removed on drop.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("darkage-test-")
        .tempdir()
        .expect("scratch directory")
}

/// Path of a not-yet-existing `config.json` inside the given directory.
#[cfg(feature = "tempfile")]
pub fn config_path_in(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("config.json")
}

/// Contents for hand-written `config.json` files.
pub mod config_fixtures {
    /// A config file that only sets a custom server address.
    pub fn partial_config_json() -> &'static str {
        r#"{
    "minecraft": {
        "ip": "play.example.net"
    },
    "rules": "Be nice."
}"#
    }

    /// A config file with keys the defaults do not know about.
    pub fn extended_config_json() -> &'static str {
        r#"{
    "welcome": {
        "enabled": false,
        "emoji": "wave"
    },
    "custom": {
        "nested": [1, 2, 3]
    }
}"#
    }

    /// A config file that is not valid JSON.
    pub fn corrupt_config_json() -> &'static str {
        "{\n    \"minecraft\": {\n        \"ip\": \"play.example.net\",\n"
    }

    /// A config file where a default map was replaced by a leaf value.
    pub fn mismatched_config_json() -> &'static str {
        r#"{ "welcome": "disabled" }"#
    }
}

/// Proptest strategies for config keys and roster names.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use proptest::prelude::*;

    /// Strategy for a single dot-path segment.
    pub fn key_strategy() -> impl Strategy<Value = String> {
        r"[a-z_][a-z0-9_]{0,11}".prop_map(|s| s)
    }

    /// Strategy for a dot path of one to four segments.
    pub fn dot_path_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(key_strategy(), 1..=4).prop_map(|keys| keys.join("."))
    }

    /// Strategy for valid Minecraft player names.
    pub fn player_name_strategy() -> impl Strategy<Value = String> {
        r"[a-zA-Z0-9_]{3,16}".prop_map(|s| s)
    }
}
