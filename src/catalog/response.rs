//! Wire format of catalog page responses.
//!
//! The catalog answers both endpoints with the same envelope:
//!
//! ```json
//! {
//!   "page": 1,
//!   "results": [
//!     {
//!       "id": 272,
//!       "title": "Batman Begins",
//!       "poster_path": "/8RW2runSEc34IwKN2D1aPcJd2UL.jpg",
//!       "backdrop_path": null,
//!       "release_date": "2005-06-10",
//!       "overview": "...",
//!       "adult": false,
//!       "original_language": "en",
//!       "vote_average": 7.7,
//!       "popularity": 61.2
//!     }
//!   ],
//!   "total_pages": 500,
//!   "total_results": 10000
//! }
//! ```
//!
//! Every item field is read leniently here and validated in one place when it is
//! mapped onto [`CatalogItem`], so a missing `title` reports a decode error
//! naming the offending item instead of an opaque serde position.

use crate::domain::error::{FilmshelfError, Result};
use crate::domain::CatalogItem;
use serde::Deserialize;

/// Page envelope as sent by the catalog. Total counts are accepted and ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPage {
    #[serde(default)]
    pub page: Option<u32>,
    pub results: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawItem {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub adult: Option<bool>,
    pub original_language: Option<String>,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
}

impl TryFrom<RawItem> for CatalogItem {
    type Error = FilmshelfError;

    fn try_from(raw: RawItem) -> Result<Self> {
        let id = raw
            .id
            .ok_or_else(|| FilmshelfError::Decode("catalog item without `id`".to_string()))?;
        let title = raw
            .title
            .ok_or_else(|| FilmshelfError::Decode(format!("catalog item {id} without `title`")))?;

        Ok(Self {
            id,
            title,
            poster_path: raw.poster_path,
            backdrop_path: raw.backdrop_path,
            release_date: raw.release_date.unwrap_or_default(),
            overview: raw.overview,
            adult: raw.adult.unwrap_or(false),
            original_language: raw.original_language,
            vote_average: raw.vote_average.unwrap_or(0.0),
            popularity: raw.popularity.unwrap_or(0.0),
        })
    }
}

/// Decodes a page body into normalized catalog items, preserving server order.
///
/// # Errors
///
/// Returns [`FilmshelfError::Decode`] if the body is not a page object or if any
/// item lacks a required field.
pub fn decode_page(body: &str) -> Result<Vec<CatalogItem>> {
    let raw: RawPage = serde_json::from_str(body)
        .map_err(|e| FilmshelfError::Decode(format!("malformed page response: {e}")))?;

    tracing::trace!(page = ?raw.page, count = raw.results.len(), "decoded page envelope");

    raw.results.into_iter().map(CatalogItem::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_page_maps_fields_in_order() {
        let body = r#"{
            "page": 2,
            "results": [
                {"id": 1, "title": "First", "release_date": "2001-01-01", "adult": false,
                 "vote_average": 6.5, "popularity": 12.0, "poster_path": "/a.jpg",
                 "original_language": "en", "overview": "one"},
                {"id": 2, "title": "Second", "backdrop_path": null}
            ],
            "total_pages": 9,
            "total_results": 170
        }"#;

        let items = decode_page(body).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, 1);
        assert_eq!(items[0].poster_path.as_deref(), Some("/a.jpg"));
        assert!((items[0].vote_average - 6.5).abs() < f64::EPSILON);
        assert_eq!(items[1].title, "Second");
        assert_eq!(items[1].release_date, "");
        assert!(items[1].backdrop_path.is_none());
    }

    #[test]
    fn test_missing_title_is_decode_error() {
        let body = r#"{"page": 1, "results": [{"id": 7, "popularity": 1.0}]}"#;

        let err = decode_page(body).unwrap_err();

        assert!(matches!(err, FilmshelfError::Decode(ref msg) if msg.contains("7")));
    }

    #[test]
    fn test_non_page_body_is_decode_error() {
        let err = decode_page(r#"{"status_code": 7, "status_message": "Invalid API key"}"#)
            .unwrap_err();
        assert!(matches!(err, FilmshelfError::Decode(_)));
    }

    #[test]
    fn test_empty_results_decode_to_empty_page() {
        let items = decode_page(r#"{"page": 501, "results": []}"#).unwrap();
        assert!(items.is_empty());
    }
}
