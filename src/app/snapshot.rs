//! Observable session snapshots.
//!
//! A [`SessionSnapshot`] is an immutable copy of everything a presentation layer
//! needs to render the catalog screen. The session publishes a fresh snapshot
//! after every state change; consumers never see the mutable state itself.

use crate::domain::CatalogItem;
use crate::storage::FavoriteRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// Accumulated results, in page order.
    pub items: Vec<CatalogItem>,

    /// Next page that will be requested.
    pub page: u32,

    /// Current search term. Empty while browsing popular items.
    pub query: String,

    /// Whether a fetch is outstanding.
    pub busy: bool,

    /// Whether the last fetch for the current query came back empty.
    pub end_of_data: bool,

    pub online: bool,

    pub selected: Option<CatalogItem>,

    /// Latest favorites, in insertion order.
    pub favorites: Vec<FavoriteRecord>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_favorite(&self, id: i64) -> bool {
        self.favorites.iter().any(|r| r.id == id)
    }

    /// Favorites as catalog items, for offline display.
    #[must_use]
    pub fn favorite_items(&self) -> Vec<CatalogItem> {
        self.favorites.iter().map(FavoriteRecord::to_item).collect()
    }
}
