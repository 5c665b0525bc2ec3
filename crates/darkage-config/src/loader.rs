//! Configuration loading and persistence with atomic file operations.

use crate::error::ConfigError;
use crate::value::ConfigDocument;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Reads and parses the document at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_document(path: &Path) -> Result<Option<ConfigDocument>, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::DocumentUnreadable {
                path: path.to_path_buf(),
                source: Box::new(e),
            })
        }
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| ConfigError::DocumentUnreadable {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
}

/// Renders a document as pretty JSON with four-space indentation.
pub fn render_document(document: &ConfigDocument) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    document.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

/// Writes `document` to `path` through a temporary sibling file.
///
/// The temporary file is fsynced and then renamed over `path`, so readers
/// of `path` see either the previous file or the complete new one.
pub fn save_document(path: &Path, document: &ConfigDocument) -> Result<(), ConfigError> {
    let write_failed = |source: io::Error| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let contents = render_document(document).map_err(|e| write_failed(e.into()))?;

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(write_failed)?;
    temp.write_all(&contents).map_err(write_failed)?;
    temp.as_file().sync_all().map_err(write_failed)?;
    temp.persist(path).map_err(|e| write_failed(e.error))?;

    debug!(path = %path.display(), bytes = contents.len(), "Config document written");
    Ok(())
}
