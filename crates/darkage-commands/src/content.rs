//! Markdown content files served by the `info`, `news` and `player` commands.

use darkage_common::DarkageError;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Server information shown by `/info`.
pub const INFO_FILE: &str = "info.md";
/// Announcements shown by `/news`.
pub const NOTICE_FILE: &str = "notice.md";
/// Player roster managed by `/player`.
pub const PLAYERS_FILE: &str = "players.md";

/// Shorter info files are treated as empty.
const MIN_INFO_LENGTH: usize = 5;
/// Longest accepted player name.
pub const MAX_PLAYER_NAME_LENGTH: usize = 32;

/// Result of reading the info file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoContent {
    /// Usable content, trimmed.
    Text(String),
    /// The file does not exist.
    Missing,
    /// The file is empty or too short to show.
    Empty,
    /// The process may not read the file.
    PermissionDenied,
    /// The file is not valid UTF-8.
    InvalidEncoding,
    /// Any other read failure.
    Unreadable,
}

/// Result of adding a name to the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddPlayerOutcome {
    /// The name was appended.
    Added(String),
    /// A name equal to it, ignoring case, is already listed.
    AlreadyListed(String),
}

/// Access to the content directory.
#[derive(Debug)]
pub struct ContentFiles {
    dir: PathBuf,
    roster_guard: Mutex<()>,
}

impl ContentFiles {
    /// Content rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            roster_guard: Mutex::new(()),
        }
    }

    /// Directory holding the content files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads `info.md`.
    pub async fn info(&self) -> InfoContent {
        let path = self.dir.join(INFO_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                let text = text.trim();
                if text.chars().count() < MIN_INFO_LENGTH {
                    InfoContent::Empty
                } else {
                    InfoContent::Text(text.to_string())
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read info file");
                match e.kind() {
                    ErrorKind::NotFound => InfoContent::Missing,
                    ErrorKind::PermissionDenied => InfoContent::PermissionDenied,
                    ErrorKind::InvalidData => InfoContent::InvalidEncoding,
                    _ => InfoContent::Unreadable,
                }
            }
        }
    }

    /// Latest announcement in `notice.md`, `None` when there is none.
    pub async fn latest_notice(&self) -> Result<Option<String>, DarkageError> {
        Ok(read_optional(&self.dir.join(NOTICE_FILE))
            .await?
            .and_then(|text| latest_entry(&text)))
    }

    /// Names listed in `players.md`, in file order.
    pub async fn players(&self) -> Result<Vec<String>, DarkageError> {
        Ok(read_optional(&self.dir.join(PLAYERS_FILE))
            .await?
            .map(|text| parse_roster(&text))
            .unwrap_or_default())
    }

    /// Appends `name` to `players.md` unless it is already listed.
    ///
    /// Concurrent additions are serialized so the duplicate check and the
    /// append see the same file.
    pub async fn add_player(&self, name: &str) -> Result<AddPlayerOutcome, DarkageError> {
        let name = validate_player_name(name)?;
        let _guard = self.roster_guard.lock().await;

        let path = self.dir.join(PLAYERS_FILE);
        let existing = read_optional(&path).await?.unwrap_or_default();
        let lowered = name.to_lowercase();
        if let Some(listed) = parse_roster(&existing)
            .into_iter()
            .find(|listed| listed.to_lowercase() == lowered)
        {
            debug!(name = %name, "Player already on the roster");
            return Ok(AddPlayerOutcome::AlreadyListed(listed));
        }

        let mut line = String::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            line.push('\n');
        }
        line.push_str("- ");
        line.push_str(&name);
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        info!(name = %name, "Player added to the roster");
        Ok(AddPlayerOutcome::Added(name))
    }
}

async fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// The last `## ` section of a notice file: its heading and the lines after it.
pub fn latest_entry(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .rposition(|line| line.trim_start().starts_with("## "))?;
    let entry = lines[start..].join("\n");
    Some(entry.trim().to_string())
}

/// Names from `- Name` lines of a roster file.
pub fn parse_roster(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.trim().strip_prefix("- "))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Trims `name` and checks it can be stored as a single roster line.
///
/// Gamertags may contain letters, digits, underscores and inner spaces.
pub fn validate_player_name(name: &str) -> Result<String, DarkageError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DarkageError::Content("Player name cannot be empty".to_string()));
    }
    if name.chars().count() > MAX_PLAYER_NAME_LENGTH {
        return Err(DarkageError::Content(format!(
            "Player name cannot be longer than {MAX_PLAYER_NAME_LENGTH} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == ' ')
    {
        return Err(DarkageError::Content(
            "Player name may only contain letters, digits, spaces and underscores".to_string(),
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_entry_takes_last_heading_and_body() {
        let text = "# News\n\n## First\nold body\n\n## Second\nnew body\nmore\n";
        assert_eq!(latest_entry(text).as_deref(), Some("## Second\nnew body\nmore"));
    }

    #[test]
    fn test_latest_entry_without_headings() {
        assert_eq!(latest_entry("# News\nnothing yet\n"), None);
        assert_eq!(latest_entry(""), None);
    }

    #[test]
    fn test_parse_roster_ignores_other_lines() {
        let text = "# Players\n\n- Steve\n-   Alex  \nnotes\n- \n* Herobrine\n";
        assert_eq!(parse_roster(text), vec!["Steve", "Alex"]);
    }

    #[test]
    fn test_validate_player_name() {
        assert_eq!(validate_player_name("  Steve_01 ").unwrap(), "Steve_01");
        assert_eq!(validate_player_name("Cool Gamer").unwrap(), "Cool Gamer");
        assert!(validate_player_name("   ").is_err());
        assert!(validate_player_name("bad\nname").is_err());
        assert!(validate_player_name("<script>").is_err());
        assert!(validate_player_name(&"a".repeat(33)).is_err());
    }

    mod properties {
        use super::*;
        use darkage_common::test_utils::property_testing::player_name_strategy;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn valid_names_survive_a_roster_line(name in player_name_strategy()) {
                let name = validate_player_name(&name).unwrap();
                prop_assert_eq!(parse_roster(&format!("- {name}\n")), vec![name]);
            }
        }
    }
}
