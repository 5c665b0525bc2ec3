//! Error types for the configuration store.

use std::path::PathBuf;

/// Failures inside the configuration store.
///
/// Neither kind escapes [`ConfigStore::get`](crate::ConfigStore::get),
/// [`ConfigStore::set`](crate::ConfigStore::set) or
/// [`ConfigStore::reload`](crate::ConfigStore::reload); they are logged and
/// the store carries on with a usable document.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed.
    #[error("config document {} is unreadable: {source}", path.display())]
    DocumentUnreadable {
        /// Canonical file path.
        path: PathBuf,
        /// Read or parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Writing the document to disk failed.
    #[error("failed to write config document {}: {source}", path.display())]
    WriteFailed {
        /// Canonical file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
