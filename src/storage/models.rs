//! Storage record models for the favorites table.
//!
//! [`FavoriteRecord`] is the persisted snapshot of a [`CatalogItem`]. It is kept
//! separate from the domain type so the on-disk shape can carry storage-only
//! fields such as `saved_at`.

use crate::domain::CatalogItem;
use serde::{Deserialize, Serialize};

/// A favorite as stored locally.
///
/// At most one record exists per `id`; writing a record with an existing `id`
/// replaces it wholesale. Records are never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: String,
    pub adult: bool,
    pub backdrop_path: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub popularity: f64,
    pub vote_average: f64,

    /// Unix timestamp when the snapshot was taken. Informational only.
    #[serde(default)]
    pub saved_at: i64,
}

impl FavoriteRecord {
    /// Snapshots a catalog item, stamping it with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use filmshelf::CatalogItem;
    /// use filmshelf::storage::FavoriteRecord;
    ///
    /// let item = CatalogItem::new(155, "The Dark Knight");
    /// let record = FavoriteRecord::from_item(&item);
    /// assert_eq!(record.id, 155);
    /// assert_eq!(record.to_item(), item);
    /// ```
    #[must_use]
    pub fn from_item(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            poster_path: item.poster_path.clone(),
            release_date: item.release_date.clone(),
            adult: item.adult,
            backdrop_path: item.backdrop_path.clone(),
            original_language: item.original_language.clone(),
            overview: item.overview.clone(),
            popularity: item.popularity,
            vote_average: item.vote_average,
            saved_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Rebuilds the catalog item this record was taken from.
    #[must_use]
    pub fn to_item(&self) -> CatalogItem {
        CatalogItem {
            id: self.id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            release_date: self.release_date.clone(),
            overview: self.overview.clone(),
            adult: self.adult,
            original_language: self.original_language.clone(),
            vote_average: self.vote_average,
            popularity: self.popularity,
        }
    }
}

impl From<&CatalogItem> for FavoriteRecord {
    fn from(item: &CatalogItem) -> Self {
        Self::from_item(item)
    }
}
