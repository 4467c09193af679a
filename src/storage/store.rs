//! Observable favorites store.
//!
//! [`FavoritesStore`] wraps a [`Storage`] backend for use from async code. Each
//! write runs on the blocking pool, re-reads the full table, and publishes the
//! result to every [`observe`](FavoritesStore::observe) receiver while still
//! holding the backend lock, so snapshots are published in write order.

use crate::domain::error::{FilmshelfError, Result};
use crate::storage::backend::Storage;
use crate::storage::models::FavoriteRecord;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task;

/// Shared handle to the favorites table. Cloning is cheap.
#[derive(Clone)]
pub struct FavoritesStore {
    backend: Arc<Mutex<Box<dyn Storage>>>,
    snapshot: Arc<watch::Sender<Vec<FavoriteRecord>>>,
}

impl FavoritesStore {
    /// Wraps a backend, reading its current contents as the first snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial listing fails.
    pub fn new(backend: Box<dyn Storage>) -> Result<Self> {
        let initial = backend.list_favorites()?;
        tracing::debug!(count = initial.len(), "favorites store ready");

        let (tx, _rx) = watch::channel(initial);
        Ok(Self {
            backend: Arc::new(Mutex::new(backend)),
            snapshot: Arc::new(tx),
        })
    }

    /// Subscribes to favorites snapshots.
    ///
    /// The receiver immediately holds the current snapshot and is notified with
    /// the complete list, in insertion order, after every upsert or delete.
    #[must_use]
    pub fn observe(&self) -> watch::Receiver<Vec<FavoriteRecord>> {
        self.snapshot.subscribe()
    }

    /// Returns a copy of the latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<FavoriteRecord> {
        self.snapshot.borrow().clone()
    }

    /// Membership test against the latest snapshot.
    #[must_use]
    pub fn is_favorite(&self, id: i64) -> bool {
        self.snapshot.borrow().iter().any(|r| r.id == id)
    }

    /// Inserts or replaces a favorite.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails or the blocking task panics.
    pub async fn upsert(&self, record: FavoriteRecord) -> Result<()> {
        tracing::debug!(id = record.id, "upserting favorite");
        self.write(move |storage| storage.upsert_favorite(&record))
            .await
    }

    /// Removes the favorite with the record's identifier. Absent ids are a no-op.
    ///
    /// Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails or the blocking task panics.
    pub async fn delete(&self, record: &FavoriteRecord) -> Result<bool> {
        let id = record.id;
        tracing::debug!(id = id, "deleting favorite");
        self.write(move |storage| storage.delete_favorite(id)).await
    }

    async fn write<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Storage) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let snapshot = Arc::clone(&self.snapshot);

        task::spawn_blocking(move || {
            let mut guard = backend
                .lock()
                .map_err(|_| FilmshelfError::Store("favorites backend lock poisoned".to_string()))?;
            let out = op(&mut **guard)?;
            // The write is committed; the next successful write republishes.
            match guard.list_favorites() {
                Ok(all) => {
                    snapshot.send_replace(all);
                }
                Err(e) => tracing::warn!(error = %e, "failed to re-read favorites after write"),
            }
            Ok(out)
        })
        .await
        .map_err(|e| FilmshelfError::Worker(format!("storage task failed: {e}")))?
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("count", &self.snapshot.borrow().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogItem;
    use crate::storage::SqliteStorage;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn store() -> FavoritesStore {
        FavoritesStore::new(Box::new(SqliteStorage::open_in_memory().unwrap())).unwrap()
    }

    /// Listing fails while `fail_list` is set; writes always go through.
    struct UnlistableStorage {
        inner: SqliteStorage,
        fail_list: Arc<AtomicBool>,
    }

    impl Storage for UnlistableStorage {
        fn list_favorites(&self) -> Result<Vec<FavoriteRecord>> {
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(FilmshelfError::Store("listing unavailable".to_string()));
            }
            self.inner.list_favorites()
        }

        fn get_favorite(&self, id: i64) -> Result<Option<FavoriteRecord>> {
            self.inner.get_favorite(id)
        }

        fn upsert_favorite(&mut self, record: &FavoriteRecord) -> Result<()> {
            self.inner.upsert_favorite(record)
        }

        fn delete_favorite(&mut self, id: i64) -> Result<bool> {
            self.inner.delete_favorite(id)
        }
    }

    #[tokio::test]
    async fn test_observers_see_every_write() {
        let store = store();
        let mut rx = store.observe();
        assert!(rx.borrow_and_update().is_empty());

        let record = FavoriteRecord::from_item(&CatalogItem::new(42, "Hitchhiker"));
        store.upsert(record.clone()).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_slice(), &[record.clone()]);
        assert!(store.is_favorite(42));

        assert!(store.delete(&record).await.unwrap());
        assert!(rx.borrow_and_update().is_empty());
        assert!(!store.is_favorite(42));
    }

    #[tokio::test]
    async fn test_delete_absent_still_republishes() {
        let store = store();
        let mut rx = store.observe();
        rx.borrow_and_update();

        let removed = store
            .delete(&FavoriteRecord::from_item(&CatalogItem::new(1, "Ghost")))
            .await
            .unwrap();

        assert!(!removed);
        assert!(rx.has_changed().unwrap());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_committed_write_succeeds_when_reread_fails() {
        let fail_list = Arc::new(AtomicBool::new(false));
        let store = FavoritesStore::new(Box::new(UnlistableStorage {
            inner: SqliteStorage::open_in_memory().unwrap(),
            fail_list: Arc::clone(&fail_list),
        }))
        .unwrap();

        fail_list.store(true, Ordering::SeqCst);
        let first = FavoriteRecord::from_item(&CatalogItem::new(1, "First"));
        store.upsert(first.clone()).await.unwrap();
        assert!(store.snapshot().is_empty());

        fail_list.store(false, Ordering::SeqCst);
        let second = FavoriteRecord::from_item(&CatalogItem::new(2, "Second"));
        store.upsert(second.clone()).await.unwrap();
        assert_eq!(store.snapshot(), vec![first, second]);
    }
}
