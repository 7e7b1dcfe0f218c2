use phonebook_core::db::{open_db, DbError};
use phonebook_core::{
    open_storage, Contact, ContactStorage, FileStorage, Phonebook, PhonebookConfig,
    RecordingNotifier, SqliteStorage, StorageBackend, StorageError,
};
use rusqlite::Connection;
use std::path::Path;

fn sample_contacts() -> Vec<Contact> {
    vec![
        Contact::with_id("id-2", "Hermione Kline", "443-89-12"),
        Contact::with_id("id-1", "Rosie Simpson", "459-12-56"),
    ]
}

fn config_for(backend: StorageBackend, data_dir: &Path) -> PhonebookConfig {
    let base = PhonebookConfig::from_lookup(|_| None)
        .unwrap()
        .with_data_dir(data_dir);
    PhonebookConfig { backend, ..base }
}

#[test]
fn file_storage_round_trip_and_layout() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::in_dir(dir.path());

    storage.save(&sample_contacts()).unwrap();

    assert_eq!(storage.path(), dir.path().join("contacts.json"));
    assert!(!dir.path().join("contacts.json.tmp").exists());
    let raw = std::fs::read_to_string(storage.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value[0],
        serde_json::json!({"id": "id-2", "name": "Hermione Kline", "number": "443-89-12"})
    );

    let reopened = FileStorage::in_dir(dir.path());
    assert_eq!(reopened.load().unwrap().unwrap(), sample_contacts());
}

#[test]
fn file_storage_overwrites_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::in_dir(dir.path());

    storage.save(&sample_contacts()).unwrap();
    storage.save(&[]).unwrap();

    assert_eq!(storage.read_slot().unwrap().as_deref(), Some("[]"));
}

#[test]
fn file_storage_creates_missing_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path().join("nested/deeper/contacts.json"));

    storage.save(&sample_contacts()).unwrap();

    assert!(storage.path().exists());
}

#[test]
fn file_storage_with_corrupt_file_loads_empty_phonebook() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("contacts.json"), "{ truncated").unwrap();

    let book =
        Phonebook::initialize(FileStorage::in_dir(dir.path()), RecordingNotifier::new()).unwrap();

    assert!(book.is_empty());
}

#[test]
fn file_storage_with_non_utf8_bytes_starts_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("contacts.json"), [0xff, 0xfe, b'[', b']']).unwrap();

    let mut book =
        Phonebook::initialize(FileStorage::in_dir(dir.path()), RecordingNotifier::new()).unwrap();
    assert!(book.is_empty());
    assert!(book.notifier().notices().is_empty());

    let added = book.add_contact("Rosie Simpson", "459-12-56").unwrap();
    let reopened = FileStorage::in_dir(dir.path());
    assert_eq!(reopened.load().unwrap().unwrap(), vec![added]);
}

#[test]
fn sqlite_storage_with_non_text_value_starts_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phonebook.sqlite3");

    for corrupt_value in ["X'fffe5b5d'", "CAST(X'fffe5b5d' AS TEXT)", "42"] {
        let storage = SqliteStorage::new(open_db(&path).unwrap());
        storage
            .connection()
            .execute(
                &format!(
                    "INSERT OR REPLACE INTO slots (key, value) VALUES ('contacts', {corrupt_value});"
                ),
                [],
            )
            .unwrap();

        let mut book = Phonebook::initialize(storage, RecordingNotifier::new())
            .unwrap_or_else(|err| panic!("value {corrupt_value}: {err}"));
        assert!(book.is_empty(), "value {corrupt_value}");

        book.add_contact("Eden Clements", "645-17-79").unwrap();
        let (storage, _) = book.into_parts();
        assert_eq!(storage.load().unwrap().unwrap().len(), 1);
    }
}

#[test]
fn sqlite_storage_without_slots_table_reports_slot_key() {
    let storage = SqliteStorage::new(Connection::open_in_memory().unwrap());

    let err = storage.read_slot().unwrap_err();

    match err {
        StorageError::Db(DbError::Slot { key, .. }) => assert_eq!(key, "contacts"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sqlite_storage_round_trip_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phonebook.sqlite3");

    let mut storage = SqliteStorage::new(open_db(&path).unwrap());
    assert!(storage.read_slot().unwrap().is_none());
    storage.save(&sample_contacts()).unwrap();
    storage.save(&sample_contacts()[..1]).unwrap();
    drop(storage);

    let reopened = SqliteStorage::new(open_db(&path).unwrap());
    let loaded = reopened.load().unwrap().unwrap();
    assert_eq!(loaded, sample_contacts()[..1].to_vec());

    let rows: i64 = reopened
        .connection()
        .query_row("SELECT COUNT(*) FROM slots", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn sqlite_storage_clear_behaves_like_absent_slot() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteStorage::new(open_db(dir.path().join("pb.sqlite3")).unwrap());
    storage.save(&sample_contacts()).unwrap();

    storage.clear().unwrap();

    assert!(storage.load().unwrap().is_none());
}

#[test]
fn open_storage_honours_backend_selection() {
    let dir = tempfile::tempdir().unwrap();

    let mut json = open_storage(&config_for(StorageBackend::Json, dir.path())).unwrap();
    json.save(&sample_contacts()).unwrap();
    assert_eq!(json.backend_name(), "json");
    assert!(dir.path().join("contacts.json").exists());

    let mut sqlite = open_storage(&config_for(StorageBackend::Sqlite, dir.path())).unwrap();
    assert!(sqlite.load().unwrap().is_none(), "backends do not share a slot");
    sqlite.save(&sample_contacts()).unwrap();
    assert_eq!(sqlite.backend_name(), "sqlite");
    assert!(dir.path().join("phonebook.sqlite3").exists());
}

#[test]
fn phonebook_survives_restart_on_each_backend() {
    for backend in [StorageBackend::Json, StorageBackend::Sqlite] {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(backend, dir.path());

        let storage = open_storage(&config).unwrap();
        let mut book = Phonebook::initialize(storage, RecordingNotifier::new()).unwrap();
        let kept = book.add_contact("Rosie Simpson", "459-12-56").unwrap();
        let dropped = book.add_contact("Eden Clements", "645-17-79").unwrap();
        book.delete_contact(&dropped.id).unwrap();
        drop(book);

        let storage = open_storage(&config).unwrap();
        let book = Phonebook::initialize(storage, RecordingNotifier::new()).unwrap();
        assert_eq!(book.contacts(), &[kept], "backend {}", backend.as_str());
    }
}
