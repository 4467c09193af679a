//! Background worker for catalog fetches and favorites writes.
//!
//! The session never awaits network or disk work itself. It posts a
//! [`WorkerMessage`], and a spawned task runs [`CatalogWorker::handle_message`]
//! and sends the resulting [`WorkerResponse`] back to the session.

use crate::catalog::CatalogApi;
use crate::domain::error::Result;
use crate::storage::FavoritesStore;
use crate::worker::messages::PageRequest;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::Arc;
use tracing::Instrument;

/// Executes worker messages against the catalog and the favorites store.
pub struct CatalogWorker {
    catalog: Arc<dyn CatalogApi>,
    favorites: FavoritesStore,
}

impl CatalogWorker {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogApi>, favorites: FavoritesStore) -> Self {
        Self { catalog, favorites }
    }

    /// The favorites store this worker writes to.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// Helper for handling storage operation results with consistent logging.
    fn handle_db_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    async fn handle_fetch_page(&self, request: PageRequest) -> WorkerResponse {
        let result = match request.query.as_deref() {
            Some(query) => self.catalog.search_page(query, request.page).await,
            None => self.catalog.fetch_page(request.page).await,
        };

        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "page fetched");
                WorkerResponse::PageLoaded { request, items }
            }
            Err(e) => {
                tracing::warn!(page = request.page, error = %e, "page fetch failed");
                WorkerResponse::PageFailed {
                    request,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Processes one message to completion.
    ///
    /// Never fails: errors are logged and reported through the response.
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        match message {
            WorkerMessage::FetchPage(request) => {
                let span = tracing::debug_span!(
                    "worker_fetch_page",
                    generation = request.generation,
                    page = request.page,
                    search = request.query.is_some()
                );
                self.handle_fetch_page(request).instrument(span).await
            }
            WorkerMessage::UpsertFavorite { record } => {
                let id = record.id;
                let result = self
                    .favorites
                    .upsert(record)
                    .instrument(tracing::debug_span!("worker_upsert_favorite", id = id))
                    .await;
                Self::handle_db_result("upsert favorite", result, |()| {
                    WorkerResponse::FavoriteSaved { id }
                })
            }
            WorkerMessage::DeleteFavorite { record } => {
                let id = record.id;
                let result = self
                    .favorites
                    .delete(&record)
                    .instrument(tracing::debug_span!("worker_delete_favorite", id = id))
                    .await;
                Self::handle_db_result("delete favorite", result, |existed| {
                    WorkerResponse::FavoriteRemoved { id, existed }
                })
            }
        }
    }
}
