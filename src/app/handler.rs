//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes user intents,
//! connectivity and favorites updates, and worker responses, translating them
//! into state changes and action sequences.
//!
//! # Event Types
//!
//! Events fall into several categories:
//! - **Paging**: `LoadMore`, `ScrolledTo`
//! - **Query**: `SearchQueryChanged`
//! - **Selection**: `SelectItem`, `ClearSelection`
//! - **Favorites**: `ToggleFavorite`, `FavoritesChanged`
//! - **System**: `ConnectivityChanged`
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Stale responses
//!
//! Every page request carries the query generation it was issued under. When
//! the query changes while a fetch is outstanding, the busy guard stays held
//! until that fetch settles; its result is then discarded and page 1 of the new
//! query is requested. At most one fetch is ever outstanding.

use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::CatalogItem;
use crate::storage::FavoriteRecord;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by intents, system changes, or worker responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Requests the next page for the current query.
    LoadMore,

    /// Replaces the search term and restarts paging.
    SearchQueryChanged(String),

    SelectItem(CatalogItem),

    ClearSelection,

    /// Adds the item to favorites, or removes it if already present.
    ToggleFavorite(CatalogItem),

    /// The presentation layer reports the last visible list index.
    ScrolledTo { last_visible_index: usize },

    ConnectivityChanged(bool),

    /// A new favorites snapshot was observed.
    FavoritesChanged(Vec<FavoriteRecord>),

    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates state, and returns actions to execute.
///
/// The boolean is `true` when observable state changed and a new snapshot
/// should be published.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for validation failures.
///
/// # Example
///
/// ```rust
/// use filmshelf::app::{handle_event, AppState, Event};
///
/// let mut state = AppState::default();
/// state.online = false;
/// let (changed, actions) = handle_event(&mut state, &Event::LoadMore)?;
/// assert!(!changed);
/// assert!(actions.is_empty());
/// # Ok::<(), filmshelf::FilmshelfError>(())
/// ```
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?EventKind::from(event)).entered();

    match event {
        Event::LoadMore => Ok(start_fetch(state)),
        Event::SearchQueryChanged(text) => {
            state.reset_query(text);
            tracing::debug!(query = %state.query, generation = state.generation, "search query changed");

            let (_, actions) = start_fetch(state);
            Ok((true, actions))
        }
        Event::SelectItem(item) => {
            tracing::debug!(id = item.id, "item selected");
            state.selected = Some(item.clone());
            Ok((true, vec![]))
        }
        Event::ClearSelection => {
            let changed = state.selected.take().is_some();
            Ok((changed, vec![]))
        }
        Event::ToggleFavorite(item) => {
            let message = state.favorite_record(item.id).map_or_else(
                || {
                    tracing::debug!(id = item.id, "adding favorite");
                    WorkerMessage::upsert_favorite(item)
                },
                |record| {
                    tracing::debug!(id = item.id, "removing favorite");
                    WorkerMessage::delete_favorite(record.clone())
                },
            );
            Ok((false, vec![Action::PostToWorker(message)]))
        }
        Event::ScrolledTo { last_visible_index } => {
            if state.should_prefetch(*last_visible_index) {
                tracing::trace!(last_visible_index = last_visible_index, "scrolled near end");
                Ok(start_fetch(state))
            } else {
                Ok((false, vec![]))
            }
        }
        Event::ConnectivityChanged(online) => {
            if state.online == *online {
                return Ok((false, vec![]));
            }
            tracing::debug!(online = online, "connectivity changed");
            state.online = *online;
            Ok((true, vec![]))
        }
        Event::FavoritesChanged(records) => {
            tracing::debug!(count = records.len(), "favorites snapshot updated");
            state.favorites.clone_from(records);
            Ok((true, vec![]))
        }
        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

fn start_fetch(state: &mut AppState) -> (bool, Vec<Action>) {
    state.begin_fetch().map_or_else(
        || (false, vec![]),
        |request| {
            (
                true,
                vec![Action::PostToWorker(WorkerMessage::fetch_page(request))],
            )
        },
    )
}

fn handle_worker_response(
    state: &mut AppState,
    response: &WorkerResponse,
) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::PageLoaded { request, items } => {
            state.end_fetch();
            if state.is_current(request) {
                state.apply_page(items);
            } else {
                tracing::debug!(
                    generation = request.generation,
                    current = state.generation,
                    "discarding stale page"
                );
            }
            Ok((true, settle_reload(state)))
        }
        WorkerResponse::PageFailed { request, message } => {
            state.end_fetch();
            tracing::warn!(page = request.page, error = %message, "failed to load page");
            Ok((true, settle_reload(state)))
        }
        WorkerResponse::FavoriteSaved { id } => {
            tracing::debug!(id = id, "favorite saved");
            Ok((false, vec![]))
        }
        WorkerResponse::FavoriteRemoved { id, existed } => {
            tracing::debug!(id = id, existed = existed, "favorite removed");
            Ok((false, vec![]))
        }
        WorkerResponse::Error { message } => {
            tracing::warn!(error = %message, "worker error");
            Ok((false, vec![]))
        }
    }
}

/// Issues the page-1 fetch deferred by a query change during a fetch.
fn settle_reload(state: &mut AppState) -> Vec<Action> {
    if !std::mem::take(&mut state.reload_pending) {
        return vec![];
    }
    tracing::debug!(query = %state.query, "reloading for changed query");
    start_fetch(state).1
}

/// Payload-free event name for span fields.
#[derive(Debug)]
enum EventKind {
    LoadMore,
    SearchQueryChanged,
    SelectItem,
    ClearSelection,
    ToggleFavorite,
    ScrolledTo,
    ConnectivityChanged,
    FavoritesChanged,
    WorkerResponse,
}

impl From<&Event> for EventKind {
    fn from(event: &Event) -> Self {
        match event {
            Event::LoadMore => Self::LoadMore,
            Event::SearchQueryChanged(_) => Self::SearchQueryChanged,
            Event::SelectItem(_) => Self::SelectItem,
            Event::ClearSelection => Self::ClearSelection,
            Event::ToggleFavorite(_) => Self::ToggleFavorite,
            Event::ScrolledTo { .. } => Self::ScrolledTo,
            Event::ConnectivityChanged(_) => Self::ConnectivityChanged,
            Event::FavoritesChanged(_) => Self::FavoritesChanged,
            Event::WorkerResponse(_) => Self::WorkerResponse,
        }
    }
}
