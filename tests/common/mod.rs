//! Shared fixtures for session integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use filmshelf::storage::{SqliteStorage, Storage};
use filmshelf::{
    CatalogApi, CatalogItem, CatalogSession, ConnectivityFlag, FavoriteRecord, FavoritesStore,
    FilmshelfError, Result, SessionOptions,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// What the fake answers for one `(query, page)` pair.
#[derive(Debug, Clone)]
pub enum Scripted {
    Items(Vec<CatalogItem>),
    Fail,
    /// Fails the first time, then serves the items.
    FailOnce(Vec<CatalogItem>),
}

/// In-memory catalog with scripted pages. Unscripted pages are empty.
///
/// With a gate, every call blocks until the test adds a permit.
#[derive(Default)]
pub struct FakeCatalog {
    script: Mutex<HashMap<(Option<String>, u32), Scripted>>,
    requests: Mutex<Vec<(Option<String>, u32)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    gate: Option<Semaphore>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn popular(self, page: u32, answer: Scripted) -> Self {
        self.script.lock().unwrap().insert((None, page), answer);
        self
    }

    pub fn search(self, query: &str, page: u32, answer: Scripted) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert((Some(query.to_string()), page), answer);
        self
    }

    /// Lets `n` blocked or future calls through.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn requests(&self) -> Vec<(Option<String>, u32)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn serve(&self, query: Option<&str>, page: u32) -> Result<Vec<CatalogItem>> {
        let key = (query.map(str::to_string), page);
        self.requests.lock().unwrap().push(key.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let mut script = self.script.lock().unwrap();
        match script.get(&key).cloned() {
            None => Ok(vec![]),
            Some(Scripted::Items(items)) => Ok(items),
            Some(Scripted::Fail) => Err(FilmshelfError::Transport("scripted failure".to_string())),
            Some(Scripted::FailOnce(items)) => {
                script.insert(key, Scripted::Items(items));
                Err(FilmshelfError::Transport("scripted failure".to_string()))
            }
        }
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn fetch_page(&self, page: u32) -> Result<Vec<CatalogItem>> {
        self.serve(None, page).await
    }

    async fn search_page(&self, query: &str, page: u32) -> Result<Vec<CatalogItem>> {
        self.serve(Some(query), page).await
    }
}

/// `count` items with ids starting at `first`.
pub fn items(first: i64, count: i64, prefix: &str) -> Vec<CatalogItem> {
    (first..first + count)
        .map(|id| CatalogItem::new(id, format!("{prefix} {id}")))
        .collect()
}

/// In-memory backend whose writes fail while the shared flag is set.
pub struct FailingWrites {
    inner: SqliteStorage,
    fail: Arc<AtomicBool>,
}

impl FailingWrites {
    pub fn new(fail: Arc<AtomicBool>) -> Self {
        Self {
            inner: SqliteStorage::open_in_memory().unwrap(),
            fail,
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FilmshelfError::Store("disk full".to_string()));
        }
        Ok(())
    }
}

impl Storage for FailingWrites {
    fn list_favorites(&self) -> Result<Vec<FavoriteRecord>> {
        self.inner.list_favorites()
    }

    fn get_favorite(&self, id: i64) -> Result<Option<FavoriteRecord>> {
        self.inner.get_favorite(id)
    }

    fn upsert_favorite(&mut self, record: &FavoriteRecord) -> Result<()> {
        self.check()?;
        self.inner.upsert_favorite(record)
    }

    fn delete_favorite(&mut self, id: i64) -> Result<bool> {
        self.check()?;
        self.inner.delete_favorite(id)
    }
}

pub fn memory_store() -> FavoritesStore {
    FavoritesStore::new(Box::new(SqliteStorage::open_in_memory().unwrap())).unwrap()
}

pub fn session(fake: &Arc<FakeCatalog>) -> CatalogSession {
    session_with(fake, memory_store(), ConnectivityFlag::new(true))
}

pub fn session_with(
    fake: &Arc<FakeCatalog>,
    store: FavoritesStore,
    connectivity: ConnectivityFlag,
) -> CatalogSession {
    let catalog: Arc<dyn CatalogApi> = fake.clone();
    CatalogSession::new(
        catalog,
        store,
        Arc::new(connectivity),
        SessionOptions::default(),
    )
}
