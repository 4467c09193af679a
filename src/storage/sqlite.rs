//! SQLite storage backend.
//!
//! Favorites live in a single `favorites` table keyed by the catalog identifier.
//! Listing order follows the `position` column, which every upsert sets past the
//! current maximum, so replacing a record moves it to the end.

use crate::domain::error::Result;
use crate::storage::backend::Storage;
use crate::storage::models::FavoriteRecord;
use crate::storage::schema;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SELECT_COLUMNS: &str = "id, title, poster_path, release_date, adult, backdrop_path, \
     original_language, overview, popularity, vote_average, saved_at";

/// SQLite-backed favorites storage.
///
/// The connection is owned exclusively; the type is `Send` but not `Sync`, and
/// [`FavoritesStore`](crate::storage::FavoritesStore) serializes access to it.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database file and migrates it to the current schema.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, if a migration fails, or
    /// if the file was written by a newer schema version.
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!(path = ?path, "opening SQLite storage");

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Opens a private in-memory database at the current schema.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(mut conn: Connection) -> Result<Self> {
        schema::init_schema(&mut conn)?;
        Ok(Self { conn })
    }

    fn read_record(row: &Row<'_>) -> rusqlite::Result<FavoriteRecord> {
        Ok(FavoriteRecord {
            id: row.get(0)?,
            title: row.get(1)?,
            poster_path: row.get(2)?,
            release_date: row.get(3)?,
            adult: row.get(4)?,
            backdrop_path: row.get(5)?,
            original_language: row.get(6)?,
            overview: row.get(7)?,
            popularity: row.get(8)?,
            vote_average: row.get(9)?,
            saved_at: row.get(10)?,
        })
    }
}

impl Storage for SqliteStorage {
    fn list_favorites(&self) -> Result<Vec<FavoriteRecord>> {
        let _span = tracing::debug_span!("sqlite_list_favorites").entered();

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM favorites ORDER BY position"))?;
        let records = stmt
            .query_map([], Self::read_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(count = records.len(), "retrieved favorites");
        Ok(records)
    }

    fn get_favorite(&self, id: i64) -> Result<Option<FavoriteRecord>> {
        let _span = tracing::debug_span!("sqlite_get_favorite", id = id).entered();

        let record = self
            .conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM favorites WHERE id = ?1"),
                [id],
                Self::read_record,
            )
            .optional()?;

        tracing::debug!(found = record.is_some(), "favorite lookup complete");
        Ok(record)
    }

    fn upsert_favorite(&mut self, record: &FavoriteRecord) -> Result<()> {
        let _span = tracing::debug_span!("sqlite_upsert_favorite", id = record.id).entered();

        self.conn.execute(
            "INSERT OR REPLACE INTO favorites
                (id, title, poster_path, release_date, adult, backdrop_path,
                 original_language, overview, popularity, vote_average, saved_at, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                 (SELECT COALESCE(MAX(position), 0) + 1 FROM favorites))",
            params![
                record.id,
                record.title,
                record.poster_path,
                record.release_date,
                record.adult,
                record.backdrop_path,
                record.original_language,
                record.overview,
                record.popularity,
                record.vote_average,
                record.saved_at,
            ],
        )?;

        tracing::debug!("favorite stored");
        Ok(())
    }

    fn delete_favorite(&mut self, id: i64) -> Result<bool> {
        let _span = tracing::debug_span!("sqlite_delete_favorite", id = id).entered();

        let removed = self.conn.execute("DELETE FROM favorites WHERE id = ?1", [id])? > 0;

        tracing::debug!(removed = removed, "favorite delete complete");
        Ok(removed)
    }
}
