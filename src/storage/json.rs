//! JSON file-based storage backend.
//!
//! This module provides a human-readable alternative to the SQLite backend. It
//! uses atomic file writes (write-to-temp + rename) to prevent corruption on
//! crashes.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - loads entire file into memory once
//! - **Write**: O(n) - serializes and writes entire dataset
//! - **Best for**: a few hundred favorites, infrequent writes

use crate::domain::error::{FilmshelfError, Result};
use crate::storage::backend::Storage;
use crate::storage::models::FavoriteRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CURRENT_VERSION: u32 = 2;

/// JSON storage container format.
///
/// Favorites are kept as a list so the file preserves insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    version: u32,

    #[serde(default)]
    favorites: Vec<FavoriteRecord>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            favorites: Vec::new(),
        }
    }
}

/// Version 1 document: every text field mandatory, absent values written as `"null"`.
#[derive(Debug, Deserialize)]
struct LegacyData {
    #[serde(default)]
    favorites: Vec<LegacyFavorite>,
}

#[derive(Debug, Deserialize)]
struct LegacyFavorite {
    id: Option<i64>,
    title: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    adult: Option<bool>,
    backdrop_path: Option<String>,
    original_language: Option<String>,
    overview: Option<String>,
    popularity: Option<f64>,
    vote_average: Option<f64>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| v != "null")
}

impl LegacyFavorite {
    fn into_record(self) -> Option<FavoriteRecord> {
        let title = present(self.title).filter(|t| !t.trim().is_empty())?;
        Some(FavoriteRecord {
            id: self.id?,
            title,
            poster_path: present(self.poster_path),
            release_date: present(self.release_date)?,
            adult: self.adult.unwrap_or(false),
            backdrop_path: present(self.backdrop_path),
            original_language: present(self.original_language),
            overview: present(self.overview),
            popularity: self.popularity.unwrap_or(0.0),
            vote_average: self.vote_average.unwrap_or(0.0),
            saved_at: 0,
        })
    }
}

/// JSON file storage backend.
///
/// The entire dataset is kept in memory and persisted on every modification.
///
/// # File Format
///
/// ```json
/// {
///   "version": 2,
///   "favorites": [
///     {
///       "id": 603,
///       "title": "The Matrix",
///       "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
///       "release_date": "1999-03-30",
///       "adult": false,
///       "backdrop_path": null,
///       "original_language": "en",
///       "overview": null,
///       "popularity": 80.1,
///       "vote_average": 8.2,
///       "saved_at": 1718000000
///     }
///   ]
/// }
/// ```
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage backend.
    ///
    /// If the file exists, loads existing data, migrating a version 1 document
    /// in memory and writing it back at the current version. Otherwise starts
    /// empty. Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON or an unknown version
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let (data, dirty) = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            (StorageData::default(), false)
        };

        tracing::debug!(favorite_count = data.favorites.len(), "storage initialized");

        let mut storage = Self {
            file_path,
            data,
            dirty,
        };
        storage.save_to_file()?;
        Ok(storage)
    }

    /// Loads storage data, returning whether it was migrated and needs saving.
    fn load_from_file(path: &Path) -> Result<(StorageData, bool)> {
        let contents = std::fs::read_to_string(path)?;
        let document: serde_json::Value = serde_json::from_str(&contents)
            .map_err(|e| FilmshelfError::Store(format!("failed to parse JSON: {e}")))?;

        let version = document
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(1);

        match version {
            1 => {
                let legacy: LegacyData = serde_json::from_value(document)
                    .map_err(|e| FilmshelfError::Store(format!("failed to parse legacy JSON: {e}")))?;
                let total = legacy.favorites.len();
                let favorites: Vec<FavoriteRecord> = legacy
                    .favorites
                    .into_iter()
                    .filter_map(LegacyFavorite::into_record)
                    .collect();
                tracing::debug!(
                    kept = favorites.len(),
                    dropped = total - favorites.len(),
                    "migrated legacy favorites document"
                );
                Ok((
                    StorageData {
                        version: CURRENT_VERSION,
                        favorites,
                    },
                    true,
                ))
            }
            2 => {
                let data: StorageData = serde_json::from_value(document)
                    .map_err(|e| FilmshelfError::Store(format!("failed to parse JSON: {e}")))?;
                tracing::debug!(favorites = data.favorites.len(), "loaded storage data");
                Ok((data, false))
            }
            other => Err(FilmshelfError::Store(format!(
                "favorites document version {other} is newer than supported version {CURRENT_VERSION}"
            ))),
        }
    }

    /// Saves storage data to disk using atomic write.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or renamed.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        Self::write_atomic(&self.file_path, &self.data)?;
        self.dirty = false;
        Ok(())
    }

    /// Persists `favorites` and only then adopts them as the in-memory state.
    ///
    /// On failure the loaded data and the dirty flag are left as they were.
    fn commit(&mut self, favorites: Vec<FavoriteRecord>) -> Result<()> {
        let next = StorageData {
            version: CURRENT_VERSION,
            favorites,
        };
        Self::write_atomic(&self.file_path, &next)?;

        self.data = next;
        self.dirty = false;
        Ok(())
    }

    fn write_atomic(path: &Path, data: &StorageData) -> Result<()> {
        tracing::debug!(path = ?path, "saving storage data");

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| FilmshelfError::Store(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;

        tracing::debug!("storage saved successfully");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn list_favorites(&self) -> Result<Vec<FavoriteRecord>> {
        let _span = tracing::debug_span!("json_list_favorites").entered();
        Ok(self.data.favorites.clone())
    }

    fn get_favorite(&self, id: i64) -> Result<Option<FavoriteRecord>> {
        let _span = tracing::debug_span!("json_get_favorite", id = id).entered();
        Ok(self.data.favorites.iter().find(|r| r.id == id).cloned())
    }

    fn upsert_favorite(&mut self, record: &FavoriteRecord) -> Result<()> {
        let _span = tracing::debug_span!("json_upsert_favorite", id = record.id).entered();

        let mut favorites = self.data.favorites.clone();
        favorites.retain(|r| r.id != record.id);
        favorites.push(record.clone());

        self.commit(favorites)
    }

    fn delete_favorite(&mut self, id: i64) -> Result<bool> {
        let _span = tracing::debug_span!("json_delete_favorite", id = id).entered();

        if !self.data.favorites.iter().any(|r| r.id == id) {
            tracing::debug!("favorite not present");
            return Ok(false);
        }

        let favorites = self
            .data
            .favorites
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();
        self.commit(favorites)?;
        Ok(true)
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}
