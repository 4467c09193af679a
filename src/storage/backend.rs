//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait that abstracts over the favorites
//! persistence backends. The trait is synchronous; the asynchronous
//! [`FavoritesStore`](crate::storage::FavoritesStore) runs every call on the
//! blocking thread pool.

use crate::domain::error::Result;
use crate::storage::models::FavoriteRecord;

/// Abstraction over persistent favorites backends.
///
/// # Implementations
///
/// - [`SqliteStorage`](crate::storage::SqliteStorage): SQLite table with schema
///   migrations (default)
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON document with atomic writes
///
/// # Examples
///
/// ```
/// use filmshelf::storage::{FavoriteRecord, SqliteStorage, Storage};
/// use filmshelf::CatalogItem;
///
/// let mut storage = SqliteStorage::open_in_memory()?;
/// storage.upsert_favorite(&FavoriteRecord::from_item(&CatalogItem::new(1, "Heat")))?;
/// assert_eq!(storage.list_favorites()?.len(), 1);
/// # Ok::<(), filmshelf::FilmshelfError>(())
/// ```
pub trait Storage: Send {
    /// Returns every favorite in insertion order.
    ///
    /// Replacing an existing record counts as a fresh insertion.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn list_favorites(&self) -> Result<Vec<FavoriteRecord>>;

    /// Retrieves a single favorite by identifier.
    ///
    /// Returns `Ok(None)` if the favorite doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn get_favorite(&self, id: i64) -> Result<Option<FavoriteRecord>>;

    /// Inserts a favorite, replacing any record with the same identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn upsert_favorite(&mut self, record: &FavoriteRecord) -> Result<()>;

    /// Removes the favorite with the given identifier.
    ///
    /// Returns whether a record was removed. Deleting an absent identifier is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn delete_favorite(&mut self, id: i64) -> Result<bool>;
}
