/// Storage and server construction against on-disk databases
use chrono::NaiveDate;
use habitquest_mcp::*;
use tempfile::NamedTempFile;

#[test]
fn test_storage_creation() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStorage::new(temp_file.path().to_path_buf());
    assert!(storage.is_ok());
}

#[test]
fn test_snapshot_survives_reopen() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let path = temp_file.path().to_path_buf();
    let day = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();

    {
        let storage = SqliteStorage::new(path.clone()).unwrap();
        let mut store = storage.load_store().unwrap();
        store.add_tag("Mind").unwrap();
        store
            .create_habit(
                Some(HabitId(7)),
                "Meditate".to_string(),
                Some("Mind".to_string()),
                HabitType::Positive,
                Frequency::Weekly,
            )
            .unwrap();
        store.toggle(HabitId(7), day, &NullSink).unwrap();
        storage.save_store(&store).unwrap();
    }

    let storage = SqliteStorage::new(path).unwrap();
    let store = storage.load_store().unwrap();
    let habit = store.habit(HabitId(7)).unwrap();
    assert_eq!(habit.streak, 1);
    assert_eq!(resolve_status(habit, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()), Status::Success);
    assert_eq!(store.tag_color("Mind"), Some(1));
}

#[tokio::test]
async fn test_server_creation_without_sync() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let server = HabitQuestServer::new(temp_file.path().to_path_buf(), None)
        .await
        .expect("Failed to create server");

    assert_eq!(server.sync_url().unwrap(), None);
    assert!(!server.sync_url_overridden());
}

#[tokio::test]
async fn test_sync_override_wins_over_stored_setting() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStorage::new(temp_file.path().to_path_buf()).unwrap();
    storage
        .set_setting(SYNC_URL_KEY, Some("https://stored.example.com"))
        .unwrap();

    let server =
        HabitQuestServer::with_storage(storage, Some("https://cli.example.com".to_string())).unwrap();
    assert_eq!(
        server.sync_url().unwrap().as_deref(),
        Some("https://cli.example.com")
    );
}
