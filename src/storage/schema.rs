use rusqlite::{Connection, Transaction};

use crate::domain::error::{FilmshelfError, Result};

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i32 = 4;

// Versions 1 and 2 are the legacy layout: a `favorite_movie` table where every
// column is NOT NULL and absent strings were stored as the literal "null".
const LEGACY_TABLE: &str = "favorite_movie";

const CREATE_FAVORITES: &str = r#"
    CREATE TABLE favorites (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        poster_path TEXT,
        release_date TEXT NOT NULL,
        adult INTEGER NOT NULL DEFAULT 0,
        backdrop_path TEXT,
        original_language TEXT,
        overview TEXT,
        popularity REAL NOT NULL DEFAULT 0,
        vote_average REAL NOT NULL DEFAULT 0,
        saved_at INTEGER NOT NULL DEFAULT 0,
        position INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX idx_favorites_position ON favorites(position);
"#;

/// Brings the database to [`SCHEMA_VERSION`], migrating legacy layouts in place.
///
/// All steps run inside one transaction, so a failed migration leaves the
/// file untouched.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    let stored: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if stored > SCHEMA_VERSION {
        return Err(FilmshelfError::Store(format!(
            "database schema version {stored} is newer than supported version {SCHEMA_VERSION}"
        )));
    }
    if stored == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;

    let mut version = stored;
    if version == 0 {
        // Unversioned files with the legacy table were written by the old app
        // before it stamped a version.
        version = if table_exists(&tx, LEGACY_TABLE)? { 2 } else { SCHEMA_VERSION };
        if version == SCHEMA_VERSION {
            tracing::debug!("creating favorites schema");
            tx.execute_batch(CREATE_FAVORITES)?;
        }
    }

    while version < SCHEMA_VERSION {
        let _span = tracing::debug_span!("schema_migration", from = version, to = version + 1)
            .entered();
        match version {
            1 => {}
            2 => migrate_nullable_columns(&tx)?,
            3 => migrate_rename_favorites(&tx)?,
            _ => {
                return Err(FilmshelfError::Store(format!(
                    "no migration path from schema version {version}"
                )))
            }
        }
        version += 1;
    }

    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))?;
    tx.commit()?;

    tracing::debug!(from = stored, to = SCHEMA_VERSION, "favorites schema ready");
    Ok(())
}

fn table_exists(tx: &Transaction<'_>, name: &str) -> Result<bool> {
    let count: i64 = tx.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

// Copy-filter-drop: SQLite cannot relax NOT NULL in place.
fn migrate_nullable_columns(tx: &Transaction<'_>) -> Result<()> {
    tx.execute_batch(
        r#"
        CREATE TABLE favorite_movie_new (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            poster_path TEXT,
            release_date TEXT NOT NULL,
            adult INTEGER NOT NULL DEFAULT 0,
            backdrop_path TEXT,
            original_language TEXT,
            overview TEXT,
            popularity REAL NOT NULL DEFAULT 0,
            vote_average REAL NOT NULL DEFAULT 0
        );

        INSERT INTO favorite_movie_new
            (id, title, poster_path, release_date, adult, backdrop_path,
             original_language, overview, popularity, vote_average)
        SELECT id, title,
               NULLIF(poster_path, 'null'),
               release_date,
               COALESCE(adult, 0),
               NULLIF(backdrop_path, 'null'),
               NULLIF(original_language, 'null'),
               NULLIF(overview, 'null'),
               COALESCE(popularity, 0),
               COALESCE(vote_average, 0)
        FROM favorite_movie
        WHERE title IS NOT NULL AND TRIM(title) <> '' AND title <> 'null'
          AND release_date IS NOT NULL AND release_date <> 'null'
        ORDER BY rowid;

        DROP TABLE favorite_movie;
        ALTER TABLE favorite_movie_new RENAME TO favorite_movie;
        DROP TABLE IF EXISTS room_master_table;
        "#,
    )?;

    let kept: i64 = tx.query_row("SELECT COUNT(*) FROM favorite_movie", [], |row| row.get(0))?;
    tracing::debug!(kept = kept, "legacy favorites copied");
    Ok(())
}

fn migrate_rename_favorites(tx: &Transaction<'_>) -> Result<()> {
    // Legacy listings came back in id order, which `position = id` preserves.
    tx.execute_batch(
        r#"
        ALTER TABLE favorite_movie RENAME TO favorites;
        ALTER TABLE favorites ADD COLUMN saved_at INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE favorites ADD COLUMN position INTEGER NOT NULL DEFAULT 0;
        UPDATE favorites SET position = id;
        CREATE INDEX idx_favorites_position ON favorites(position);
        "#,
    )?;
    Ok(())
}
