//! Catalog session state.
//!
//! This module defines [`AppState`], the single source of truth for one
//! browsing session: the page cursor, the search term, the busy guard, the
//! accumulated results, the selection and the last favorites snapshot.
//!
//! # Invariants
//!
//! - `page >= 1`; it only grows while the query is unchanged and is reset to 1
//!   when the query changes.
//! - `in_flight` is `Some` exactly while `fetch_state` is `Fetching`.
//! - Each query change bumps `generation`, so a page tagged with an older
//!   generation is recognisably stale.
//!
//! # Example
//!
//! ```rust
//! use filmshelf::app::{AppState, SessionOptions};
//!
//! let mut state = AppState::new(SessionOptions::default());
//! let request = state.begin_fetch().expect("idle and online");
//! assert_eq!(request.page, 1);
//! assert!(state.begin_fetch().is_none());
//! ```

use super::modes::FetchState;
use super::snapshot::SessionSnapshot;
use crate::domain::CatalogItem;
use crate::storage::FavoriteRecord;
use crate::worker::PageRequest;

/// Tunables for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Trim surrounding whitespace from search terms.
    pub trim_query: bool,

    /// How close to the end of the list a scroll must reach to load more.
    pub prefetch_distance: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            trim_query: true,
            prefetch_distance: 1,
        }
    }
}

/// Central session state container.
///
/// Mutated only by [`handle_event`](crate::app::handle_event).
#[derive(Debug, Clone)]
pub struct AppState {
    /// Accumulated results for the current query, in page order.
    pub items: Vec<CatalogItem>,

    /// Page cursor: the next page to request.
    pub page: u32,

    /// Current search term. Empty means browse popular.
    pub query: String,

    /// Busy guard.
    pub fetch_state: FetchState,

    pub selected: Option<CatalogItem>,

    /// Latest observed favorites snapshot.
    pub favorites: Vec<FavoriteRecord>,

    /// Last connectivity signal.
    pub online: bool,

    /// Bumped on every query change.
    pub generation: u64,

    /// The outstanding request, if any.
    pub in_flight: Option<PageRequest>,

    /// The query changed while a fetch was outstanding; page 1 must be
    /// requested once that fetch settles.
    pub reload_pending: bool,

    /// The last fetch for the current query returned no items.
    pub end_of_data: bool,

    pub options: SessionOptions,
}

impl AppState {
    #[must_use]
    pub fn new(options: SessionOptions) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            query: String::new(),
            fetch_state: FetchState::Idle,
            selected: None,
            favorites: Vec::new(),
            online: true,
            generation: 0,
            in_flight: None,
            reload_pending: false,
            end_of_data: false,
            options,
        }
    }

    /// Enters `Fetching` and returns the request to issue.
    ///
    /// Returns `None`, leaving the state untouched, when a fetch is already
    /// outstanding or the session is offline.
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if self.fetch_state.is_busy() {
            tracing::debug!("fetch already in flight, dropping load request");
            return None;
        }
        if !self.online {
            tracing::debug!("offline, skipping fetch");
            return None;
        }

        let request = PageRequest::new(self.generation, &self.query, self.page);
        tracing::debug!(
            generation = request.generation,
            page = request.page,
            query = %self.query,
            "beginning fetch"
        );

        self.fetch_state = FetchState::Fetching;
        self.in_flight = Some(request.clone());
        Some(request)
    }

    /// Releases the busy guard.
    pub fn end_fetch(&mut self) {
        self.fetch_state = FetchState::Idle;
        self.in_flight = None;
    }

    /// Whether a response for `request` belongs to the current query.
    #[must_use]
    pub fn is_current(&self, request: &PageRequest) -> bool {
        request.generation == self.generation
    }

    /// Replaces the query and resets paging for it.
    pub fn reset_query(&mut self, text: &str) {
        self.query = if self.options.trim_query {
            text.trim().to_string()
        } else {
            text.to_string()
        };
        self.page = 1;
        self.items.clear();
        self.end_of_data = false;
        self.generation = self.generation.wrapping_add(1);

        if self.fetch_state.is_busy() {
            self.reload_pending = true;
        }
    }

    /// Applies a page for the current query.
    ///
    /// An empty page changes nothing except the end-of-data marker.
    pub fn apply_page(&mut self, items: &[CatalogItem]) {
        if items.is_empty() {
            tracing::debug!(page = self.page, "empty page, end of data");
            self.end_of_data = true;
            return;
        }

        if self.page == 1 {
            self.items.clear();
        }
        self.items.extend_from_slice(items);
        self.page = self.page.saturating_add(1);
        self.end_of_data = false;

        tracing::debug!(
            total = self.items.len(),
            next_page = self.page,
            "page applied"
        );
    }

    /// Whether a scroll reaching `last_visible_index` should load the next page.
    #[must_use]
    pub fn should_prefetch(&self, last_visible_index: usize) -> bool {
        !self.end_of_data
            && last_visible_index.saturating_add(self.options.prefetch_distance) >= self.items.len()
    }

    #[must_use]
    pub fn favorite_record(&self, id: i64) -> Option<&FavoriteRecord> {
        self.favorites.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn is_favorite(&self, id: i64) -> bool {
        self.favorite_record(id).is_some()
    }

    /// Copies the observable parts of the state.
    #[must_use]
    pub fn compute_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            items: self.items.clone(),
            page: self.page,
            query: self.query.clone(),
            busy: self.fetch_state.is_busy(),
            end_of_data: self.end_of_data,
            online: self.online,
            selected: self.selected.clone(),
            favorites: self.favorites.clone(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: std::ops::Range<i64>) -> Vec<CatalogItem> {
        ids.map(|id| CatalogItem::new(id, format!("Item {id}"))).collect()
    }

    #[test]
    fn test_begin_fetch_is_exclusive() {
        let mut state = AppState::default();

        assert!(state.begin_fetch().is_some());
        assert!(state.begin_fetch().is_none());

        state.end_fetch();
        assert!(state.begin_fetch().is_some());
    }

    #[test]
    fn test_offline_blocks_fetch() {
        let mut state = AppState::default();
        state.online = false;

        assert!(state.begin_fetch().is_none());
        assert_eq!(state.fetch_state, FetchState::Idle);
    }

    #[test]
    fn test_first_page_replaces_items() {
        let mut state = AppState::default();
        state.items = items(100..103);

        state.apply_page(&items(0..2));
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.page, 2);

        state.apply_page(&items(2..4));
        assert_eq!(state.items.len(), 4);
        assert_eq!(state.page, 3);
    }

    #[test]
    fn test_empty_page_only_marks_end() {
        let mut state = AppState::default();
        state.apply_page(&items(0..3));

        state.apply_page(&[]);

        assert_eq!(state.items.len(), 3);
        assert_eq!(state.page, 2);
        assert!(state.end_of_data);
    }

    #[test]
    fn test_reset_query_trims_and_bumps_generation() {
        let mut state = AppState::default();
        let stale = state.begin_fetch().unwrap();

        state.reset_query("  heat ");

        assert_eq!(state.query, "heat");
        assert_eq!(state.page, 1);
        assert!(!state.is_current(&stale));
        assert!(state.reload_pending);
    }

    #[test]
    fn test_reset_query_keeps_whitespace_when_configured() {
        let mut state = AppState::new(SessionOptions {
            trim_query: false,
            prefetch_distance: 1,
        });

        state.reset_query(" heat");

        assert_eq!(state.query, " heat");
        assert!(!state.reload_pending);
    }

    #[test]
    fn test_prefetch_distance() {
        let mut state = AppState::new(SessionOptions {
            trim_query: true,
            prefetch_distance: 3,
        });
        state.apply_page(&items(0..10));

        assert!(!state.should_prefetch(5));
        assert!(state.should_prefetch(7));

        state.end_of_data = true;
        assert!(!state.should_prefetch(9));
    }
}
