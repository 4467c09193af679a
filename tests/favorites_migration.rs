//! Upgrading favorites databases written by the legacy schema.

use filmshelf::storage::{SqliteStorage, Storage};
use filmshelf::{FavoritesStore, FilmshelfError};
use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

const LEGACY_SCHEMA: &str = r#"
    CREATE TABLE room_master_table (id INTEGER PRIMARY KEY, identity_hash TEXT);
    CREATE TABLE favorite_movie (
        id INTEGER NOT NULL,
        title TEXT NOT NULL,
        poster_path TEXT NOT NULL,
        release_date TEXT NOT NULL,
        adult INTEGER NOT NULL,
        backdrop_path TEXT NOT NULL,
        original_language TEXT NOT NULL,
        overview TEXT NOT NULL,
        popularity REAL NOT NULL,
        vote_average REAL NOT NULL,
        PRIMARY KEY(id)
    );
"#;

fn write_legacy_db(path: &Path, user_version: i32) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(LEGACY_SCHEMA).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {user_version}")).unwrap();

    let rows = [
        (603, "The Matrix", "/matrix.jpg", "1999-03-30", "null", "en", "Neo wakes up."),
        (155, "The Dark Knight", "null", "2008-07-16", "/dk.jpg", "null", "null"),
        // Unusable: no title or no release date.
        (11, "null", "/a.jpg", "1977-05-25", "null", "en", "null"),
        (12, "  ", "/b.jpg", "2003-05-30", "null", "en", "null"),
        (13, "Ghost", "/c.jpg", "null", "null", "en", "null"),
    ];
    for (id, title, poster, release, backdrop, language, overview) in rows {
        conn.execute(
            "INSERT INTO favorite_movie VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7, 12.5, 7.9)",
            rusqlite::params![id, title, poster, release, backdrop, language, overview],
        )
        .unwrap();
    }
}

fn user_version(path: &Path) -> i32 {
    Connection::open(path)
        .unwrap()
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .unwrap()
}

fn table_names(path: &Path) -> Vec<String> {
    let conn = Connection::open(path).unwrap();
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<Vec<String>>>()
        .unwrap()
}

#[test]
fn test_legacy_database_is_upgraded_in_place() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("favorites.db");
    write_legacy_db(&path, 2);

    let storage = SqliteStorage::open(&path).unwrap();
    let favorites = storage.list_favorites().unwrap();

    let ids: Vec<i64> = favorites.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![155, 603]);

    let knight = &favorites[0];
    assert_eq!(knight.title, "The Dark Knight");
    assert_eq!(knight.poster_path, None);
    assert_eq!(knight.backdrop_path.as_deref(), Some("/dk.jpg"));
    assert_eq!(knight.original_language, None);
    assert_eq!(knight.overview, None);
    assert_eq!(knight.saved_at, 0);

    let matrix = &favorites[1];
    assert_eq!(matrix.poster_path.as_deref(), Some("/matrix.jpg"));
    assert_eq!(matrix.backdrop_path, None);
    assert_eq!(matrix.overview.as_deref(), Some("Neo wakes up."));
    assert!((matrix.vote_average - 7.9).abs() < f64::EPSILON);

    drop(storage);
    assert_eq!(user_version(&path), 4);
    assert_eq!(table_names(&path), vec!["favorites".to_string()]);
}

#[test]
fn test_unversioned_legacy_file_is_migrated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("favorites.db");
    write_legacy_db(&path, 0);

    let storage = SqliteStorage::open(&path).unwrap();

    assert_eq!(storage.list_favorites().unwrap().len(), 2);
}

#[test]
fn test_reopen_after_migration_keeps_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("favorites.db");
    write_legacy_db(&path, 1);

    let first = SqliteStorage::open(&path).unwrap().list_favorites().unwrap();
    let second = SqliteStorage::open(&path).unwrap().list_favorites().unwrap();

    assert_eq!(first, second);
    assert_eq!(user_version(&path), 4);
}

#[test]
fn test_migrated_records_accept_new_favorites() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("favorites.db");
    write_legacy_db(&path, 2);

    let mut storage = SqliteStorage::open(&path).unwrap();
    let mut heat = storage.get_favorite(603).unwrap().unwrap();
    heat.id = 949;
    heat.title = "Heat".to_string();
    storage.upsert_favorite(&heat).unwrap();

    let ids: Vec<i64> = storage.list_favorites().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![155, 603, 949]);
    assert!(storage.delete_favorite(155).unwrap());
    assert!(!storage.delete_favorite(155).unwrap());
}

#[test]
fn test_newer_database_is_refused_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("favorites.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE future (x INTEGER); PRAGMA user_version = 7;")
            .unwrap();
    }

    let err = SqliteStorage::open(&path).unwrap_err();

    assert!(matches!(err, FilmshelfError::Store(_)));
    assert_eq!(user_version(&path), 7);
    assert_eq!(table_names(&path), vec!["future".to_string()]);
}

#[tokio::test]
async fn test_store_publishes_migrated_favorites() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("favorites.db");
    write_legacy_db(&path, 2);

    let store = FavoritesStore::new(Box::new(SqliteStorage::open(&path).unwrap())).unwrap();

    assert!(store.is_favorite(603));
    assert!(!store.is_favorite(11));

    let matrix = store.snapshot().into_iter().find(|r| r.id == 603).unwrap();
    assert!(store.delete(&matrix).await.unwrap());
    assert!(!store.is_favorite(603));

    let reopened = SqliteStorage::open(&path).unwrap();
    assert!(reopened.get_favorite(603).unwrap().is_none());
}
