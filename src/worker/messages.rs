//! Worker message types.
//!
//! This module defines the request and response protocol between the session
//! and the background worker that performs catalog fetches and favorites writes.
//! Every page request is tagged with the query generation it was issued for, so
//! the session can recognise and discard responses for a superseded query.

use crate::domain::CatalogItem;
use crate::storage::FavoriteRecord;
use serde::{Deserialize, Serialize};

/// A single page fetch, tagged with the query generation that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Query generation at the time the request was issued.
    pub generation: u64,

    /// Search term; `None` browses the popular listing.
    pub query: Option<String>,

    /// 1-based page number.
    pub page: u32,
}

impl PageRequest {
    /// Builds a request, routing an empty term to the popular listing.
    #[must_use]
    pub fn new(generation: u64, query: &str, page: u32) -> Self {
        Self {
            generation,
            query: (!query.is_empty()).then(|| query.to_string()),
            page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerMessage {
    FetchPage(PageRequest),

    UpsertFavorite { record: FavoriteRecord },

    DeleteFavorite { record: FavoriteRecord },
}

impl WorkerMessage {
    pub fn fetch_page(request: PageRequest) -> Self {
        Self::FetchPage(request)
    }

    pub fn upsert_favorite(item: &CatalogItem) -> Self {
        Self::UpsertFavorite {
            record: FavoriteRecord::from_item(item),
        }
    }

    pub fn delete_favorite(record: FavoriteRecord) -> Self {
        Self::DeleteFavorite { record }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    PageLoaded {
        request: PageRequest,

        items: Vec<CatalogItem>,
    },

    /// The fetch failed. The session still releases its busy guard.
    PageFailed {
        request: PageRequest,

        message: String,
    },

    FavoriteSaved {
        id: i64,
    },

    FavoriteRemoved {
        id: i64,

        existed: bool,
    },

    Error {
        message: String,
    },
}
