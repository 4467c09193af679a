//! Catalog session runtime.
//!
//! [`CatalogSession`] drives the pure [`handle_event`] state machine. Intents
//! are synchronous and return immediately; the fetches and favorites writes
//! they trigger run as spawned tokio tasks, and their outcomes are applied when
//! the owner calls [`CatalogSession::next_response`] (or
//! [`CatalogSession::settle`]).
//!
//! The session itself is confined to one task (`&mut self`); only its snapshot
//! channel is shared.
//!
//! # Example
//!
//! ```no_run
//! use filmshelf::{build_session, Config};
//!
//! # async fn run() -> filmshelf::Result<()> {
//! let config = Config::load(None)?;
//! let mut session = build_session(&config)?;
//! let mut snapshots = session.subscribe();
//!
//! session.start();
//! session.settle().await;
//! println!("{} items", snapshots.borrow_and_update().items.len());
//! # Ok(())
//! # }
//! ```

use crate::app::{handle_event, Action, AppState, Event, SessionOptions, SessionSnapshot};
use crate::catalog::CatalogApi;
use crate::domain::CatalogItem;
use crate::infrastructure::Connectivity;
use crate::storage::{FavoriteRecord, FavoritesStore};
use crate::worker::{CatalogWorker, WorkerMessage, WorkerResponse};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;

/// One browsing session over the catalog and the local favorites.
///
/// Intents must be called from within a tokio runtime, since they spawn the
/// work they trigger.
pub struct CatalogSession {
    state: AppState,
    worker: Arc<CatalogWorker>,
    connectivity: Arc<dyn Connectivity>,
    favorites: watch::Receiver<Vec<FavoriteRecord>>,
    snapshots: watch::Sender<SessionSnapshot>,
    tasks: JoinSet<WorkerResponse>,
}

impl CatalogSession {
    /// Creates an idle session. Nothing is fetched until [`start`](Self::start)
    /// or another intent is called.
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        favorites: FavoritesStore,
        connectivity: Arc<dyn Connectivity>,
        options: SessionOptions,
    ) -> Self {
        let mut favorites_rx = favorites.observe();

        let mut state = AppState::new(options);
        state.favorites = favorites_rx.borrow_and_update().clone();
        state.online = connectivity.is_online();

        let (snapshots, _rx) = watch::channel(state.compute_snapshot());

        Self {
            state,
            worker: Arc::new(CatalogWorker::new(catalog, favorites)),
            connectivity,
            favorites: favorites_rx,
            snapshots,
            tasks: JoinSet::new(),
        }
    }

    /// Subscribes to state snapshots, published after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        self.worker.favorites()
    }

    /// Performs the initial page-1 load.
    pub fn start(&mut self) {
        tracing::debug!("starting catalog session");
        self.load_more();
    }

    /// Fetches the next page for the current query, unless a fetch is already
    /// outstanding or the session is offline.
    pub fn load_more(&mut self) {
        self.refresh_connectivity();
        self.dispatch(Event::LoadMore);
    }

    /// Replaces the search term, discarding accumulated results, and loads
    /// page 1 for it. An empty term browses popular items.
    pub fn set_search_query(&mut self, text: &str) {
        self.refresh_connectivity();
        self.dispatch(Event::SearchQueryChanged(text.to_string()));
    }

    pub fn set_selected(&mut self, item: CatalogItem) {
        self.dispatch(Event::SelectItem(item));
    }

    pub fn clear_selection(&mut self) {
        self.dispatch(Event::ClearSelection);
    }

    /// Removes the item from favorites if present in the latest snapshot,
    /// otherwise stores a snapshot of it.
    pub fn toggle_favorite(&mut self, item: &CatalogItem) {
        self.sync_favorites();
        self.dispatch(Event::ToggleFavorite(item.clone()));
    }

    /// Loads the next page when `last_visible_index` is within the configured
    /// prefetch distance of the end of the list.
    pub fn on_scroll(&mut self, last_visible_index: usize) {
        self.refresh_connectivity();
        self.dispatch(Event::ScrolledTo { last_visible_index });
    }

    /// Membership test against the latest favorites snapshot.
    pub fn is_favorite(&mut self, id: i64) -> bool {
        self.sync_favorites();
        self.state.is_favorite(id)
    }

    /// Number of spawned tasks whose responses have not been applied yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for one outstanding task and applies its response.
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub async fn next_response(&mut self) -> bool {
        let Some(joined) = self.tasks.join_next().await else {
            return false;
        };

        match joined {
            Ok(response) => {
                self.sync_favorites();
                self.dispatch(Event::WorkerResponse(response));
            }
            Err(e) => tracing::warn!(error = %e, "worker task aborted"),
        }
        true
    }

    /// Applies responses until no task is in flight, including any follow-up
    /// fetches those responses trigger.
    pub async fn settle(&mut self) {
        while self.next_response().await {}
    }

    fn dispatch(&mut self, event: Event) {
        match handle_event(&mut self.state, &event) {
            Ok((changed, actions)) => {
                for action in actions {
                    self.execute_action(action);
                }
                if changed {
                    self.publish();
                }
            }
            Err(e) => tracing::warn!(error = %e, "event handling failed"),
        }
    }

    fn execute_action(&mut self, action: Action) {
        match action {
            Action::PostToWorker(message) => {
                // A panicking fetch must still release the busy guard.
                let fallback = match &message {
                    WorkerMessage::FetchPage(request) => Some(request.clone()),
                    _ => None,
                };
                let worker = Arc::clone(&self.worker);
                let handle = tokio::spawn(async move { worker.handle_message(message).await });

                self.tasks.spawn(async move {
                    match handle.await {
                        Ok(response) => response,
                        Err(e) => match fallback {
                            Some(request) => WorkerResponse::PageFailed {
                                request,
                                message: format!("worker task failed: {e}"),
                            },
                            None => WorkerResponse::Error {
                                message: format!("worker task failed: {e}"),
                            },
                        },
                    }
                });
            }
        }
    }

    fn sync_favorites(&mut self) {
        if self.favorites.has_changed().unwrap_or(false) {
            let records = self.favorites.borrow_and_update().clone();
            self.dispatch(Event::FavoritesChanged(records));
        }
    }

    fn refresh_connectivity(&mut self) {
        let online = self.connectivity.is_online();
        self.dispatch(Event::ConnectivityChanged(online));
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.compute_snapshot());
    }
}

impl std::fmt::Debug for CatalogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSession")
            .field("state", &self.state)
            .field("pending", &self.tasks.len())
            .finish_non_exhaustive()
    }
}
