//! Integration tests for darkage-commands crate.

use darkage_commands::{AddPlayerOutcome, ContentFiles, InfoContent, INFO_FILE, NOTICE_FILE, PLAYERS_FILE};
use darkage_common::test_utils::{create_temp_dir, init_test_logging};
use darkage_common::DarkageError;
use std::sync::Arc;

#[tokio::test]
async fn test_info_outcomes() {
    init_test_logging();
    let dir = create_temp_dir();
    let content = ContentFiles::new(dir.path());

    assert_eq!(content.info().await, InfoContent::Missing);

    std::fs::write(dir.path().join(INFO_FILE), "  hi \n").unwrap();
    assert_eq!(content.info().await, InfoContent::Empty);

    std::fs::write(dir.path().join(INFO_FILE), [0xff, 0xfe, 0x00, 0x41, 0x42, 0x43]).unwrap();
    assert_eq!(content.info().await, InfoContent::InvalidEncoding);

    std::fs::write(dir.path().join(INFO_FILE), "\n# DarkAge SMP\nSurvival since 2021.\n").unwrap();
    assert_eq!(
        content.info().await,
        InfoContent::Text("# DarkAge SMP\nSurvival since 2021.".to_string())
    );
}

#[tokio::test]
async fn test_latest_notice() {
    let dir = create_temp_dir();
    let content = ContentFiles::new(dir.path());

    assert_eq!(content.latest_notice().await.unwrap(), None);

    std::fs::write(
        dir.path().join(NOTICE_FILE),
        "# Notices\n\n## 2024-01-01\nServer reset.\n\n## 2024-02-01\nNew spawn!\n",
    )
    .unwrap();
    assert_eq!(
        content.latest_notice().await.unwrap().as_deref(),
        Some("## 2024-02-01\nNew spawn!")
    );
}

#[tokio::test]
async fn test_add_player_rejects_duplicates_ignoring_case() {
    let dir = create_temp_dir();
    let content = ContentFiles::new(dir.path());

    assert_eq!(
        content.add_player("Steve").await.unwrap(),
        AddPlayerOutcome::Added("Steve".to_string())
    );
    assert_eq!(
        content.add_player(" steve ").await.unwrap(),
        AddPlayerOutcome::AlreadyListed("Steve".to_string())
    );
    assert_eq!(
        content.add_player("Alex").await.unwrap(),
        AddPlayerOutcome::Added("Alex".to_string())
    );

    assert_eq!(content.players().await.unwrap(), vec!["Steve", "Alex"]);
    let raw = std::fs::read_to_string(dir.path().join(PLAYERS_FILE)).unwrap();
    assert_eq!(raw, "- Steve\n- Alex\n");
}

#[tokio::test]
async fn test_add_player_keeps_existing_file_contents() {
    let dir = create_temp_dir();
    std::fs::write(dir.path().join(PLAYERS_FILE), "# Players\n\n- Notch").unwrap();
    let content = ContentFiles::new(dir.path());

    content.add_player("Jeb").await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join(PLAYERS_FILE)).unwrap();
    assert_eq!(raw, "# Players\n\n- Notch\n- Jeb\n");
}

#[tokio::test]
async fn test_add_player_rejects_invalid_names() {
    let dir = create_temp_dir();
    let content = ContentFiles::new(dir.path());

    let err = content.add_player("- evil\n- more").await.unwrap_err();
    assert!(matches!(err, DarkageError::Content(_)));
    assert!(!dir.path().join(PLAYERS_FILE).exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_of_same_name_store_one_line() {
    let dir = create_temp_dir();
    let content = Arc::new(ContentFiles::new(dir.path()));

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let content = Arc::clone(&content);
            let name = if i % 2 == 0 { "Herobrine" } else { "HEROBRINE" };
            tokio::spawn(async move { content.add_player(name).await.unwrap() })
        })
        .collect();

    let mut added = 0;
    for task in tasks {
        if matches!(task.await.unwrap(), AddPlayerOutcome::Added(_)) {
            added += 1;
        }
    }

    assert_eq!(added, 1);
    assert_eq!(content.players().await.unwrap().len(), 1);
}

#[test]
fn test_roster_reads_missing_file_as_empty() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let dir = create_temp_dir();
    let content = ContentFiles::new(dir.path());
    assert!(runtime.block_on(content.players()).unwrap().is_empty());
}
