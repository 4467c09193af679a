//! Catalog item domain model.
//!
//! [`CatalogItem`] is the normalized shape every remote listing is mapped onto.
//! Items are immutable once built and are never written back to the catalog.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A movie as listed by the remote catalog.
///
/// Two items denote the same movie when their `id` matches; membership tests
/// against favorites compare identifiers, never whole values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// ISO-like date as sent by the catalog. Not validated; empty when omitted.
    pub release_date: String,
    pub overview: Option<String>,
    pub adult: bool,
    pub original_language: Option<String>,
    pub vote_average: f64,
    pub popularity: f64,
}

impl CatalogItem {
    /// Creates an item with the required fields and neutral defaults for the rest.
    ///
    /// # Examples
    ///
    /// ```
    /// use filmshelf::CatalogItem;
    ///
    /// let item = CatalogItem::new(272, "Batman Begins");
    /// assert_eq!(item.id, 272);
    /// assert!(item.poster_path.is_none());
    /// ```
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            release_date: String::new(),
            overview: None,
            adult: false,
            original_language: None,
            vote_average: 0.0,
            popularity: 0.0,
        }
    }

    /// Returns the release year when the release date parses as `YYYY-MM-DD`.
    ///
    /// # Examples
    ///
    /// ```
    /// use filmshelf::CatalogItem;
    ///
    /// let mut item = CatalogItem::new(1, "Heat");
    /// item.release_date = "1995-12-15".to_string();
    /// assert_eq!(item.release_year(), Some(1995));
    ///
    /// item.release_date = String::new();
    /// assert_eq!(item.release_year(), None);
    /// ```
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(self.release_date.trim(), "%Y-%m-%d")
            .ok()
            .map(|date| date.year())
    }

    /// Builds the poster image URL for the given size bucket (e.g. `w500`).
    #[must_use]
    pub fn poster_url(&self, image_base_url: &str, size: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| image_url(image_base_url, size, path))
    }

    /// Builds the backdrop image URL for the given size bucket.
    #[must_use]
    pub fn backdrop_url(&self, image_base_url: &str, size: &str) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|path| image_url(image_base_url, size, path))
    }
}

fn image_url(base: &str, size: &str, path: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        size.trim_matches('/'),
        path.trim_start_matches('/')
    )
}
