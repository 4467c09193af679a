//! Remote catalog client.
//!
//! This module defines the [`CatalogApi`] trait the session depends on and the
//! reqwest-backed [`HttpCatalogClient`] implementation. Each call is exactly one
//! request/response round trip: no caching and no retries. A transport timeout
//! is configured on the underlying HTTP client.

use super::response::decode_page;
use crate::domain::error::{FilmshelfError, Result};
use crate::domain::CatalogItem;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::Instrument;

const POPULAR_PATH: &str = "movie/popular";
const SEARCH_PATH: &str = "search/movie";

/// Abstraction over the two read-only catalog operations.
///
/// Implementations must be shareable across tasks; the session clones an
/// `Arc<dyn CatalogApi>` into every in-flight fetch.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Lists popular items for a 1-based page.
    ///
    /// # Errors
    ///
    /// Returns [`FilmshelfError::Transport`] on network or HTTP failure and
    /// [`FilmshelfError::Decode`] if the response cannot be mapped to items.
    async fn fetch_page(&self, page: u32) -> Result<Vec<CatalogItem>>;

    /// Searches items by free-text query for a 1-based page.
    ///
    /// Callers must route empty queries to [`CatalogApi::fetch_page`] instead.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`CatalogApi::fetch_page`].
    async fn search_page(&self, query: &str, page: u32) -> Result<Vec<CatalogItem>>;
}

/// HTTP implementation of [`CatalogApi`] for TMDB-compatible services.
pub struct HttpCatalogClient {
    client: Client,
    base_url: Url,
    api_key: String,
    language: Option<String>,
}

impl HttpCatalogClient {
    /// Creates a client for the given base URL and static API key.
    ///
    /// A trailing slash is added to the base URL when missing so endpoint paths
    /// join underneath it rather than replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`FilmshelfError::Config`] if the base URL does not parse, the
    /// API key is empty, or the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FilmshelfError::Config("catalog API key is empty".to_string()));
        }

        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| FilmshelfError::Config(format!("invalid catalog base URL {base_url:?}: {e}")))?;

        let client = Client::builder()
            .user_agent(concat!("filmshelf/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| FilmshelfError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(base_url = %base_url, timeout_secs = timeout.as_secs(), "catalog client created");

        Ok(Self {
            client,
            base_url,
            api_key,
            language: None,
        })
    }

    /// Requests localized results (e.g. `es-ES`) on every call.
    #[must_use]
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Builds the full endpoint URL, including the API key and paging parameters.
    pub(crate) fn endpoint_url(&self, path: &str, query: Option<&str>, page: u32) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| FilmshelfError::Config(format!("invalid endpoint path {path:?}: {e}")))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            if let Some(query) = query {
                pairs.append_pair("query", query);
            }
            pairs.append_pair("page", &page.to_string());
            if let Some(language) = &self.language {
                pairs.append_pair("language", language);
            }
        }

        Ok(url)
    }

    async fn get_page(&self, path: &str, query: Option<&str>, page: u32) -> Result<Vec<CatalogItem>> {
        if page == 0 {
            return Err(FilmshelfError::InvalidRequest("pages are 1-based".to_string()));
        }

        let url = self.endpoint_url(path, query, page)?;

        // The URL carries the API key, so only the path is logged.
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!(path = path, page = page, status = status.as_u16(), "catalog responded");

        if !status.is_success() {
            return Err(FilmshelfError::Transport(format!(
                "catalog returned HTTP {status} for {path} page {page}"
            )));
        }

        let body = response.text().await?;
        decode_page(&body)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<CatalogItem>> {
        self.get_page(POPULAR_PATH, None, page)
            .instrument(tracing::debug_span!("catalog_fetch_page", page = page))
            .await
    }

    async fn search_page(&self, query: &str, page: u32) -> Result<Vec<CatalogItem>> {
        if query.trim().is_empty() {
            return Err(FilmshelfError::InvalidRequest(
                "search query must not be empty".to_string(),
            ));
        }
        self.get_page(SEARCH_PATH, Some(query), page)
            .instrument(tracing::debug_span!("catalog_search_page", query = %query, page = page))
            .await
    }
}

impl std::fmt::Debug for HttpCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogClient")
            .field("base_url", &self.base_url.as_str())
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpCatalogClient {
        HttpCatalogClient::new("https://api.example.test/3", "secret", Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_popular_url_keeps_base_path() {
        let url = client().endpoint_url(POPULAR_PATH, None, 3).unwrap();

        assert_eq!(url.path(), "/3/movie/popular");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("api_key".to_string(), "secret".to_string())));
        assert!(pairs.contains(&("page".to_string(), "3".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "query"));
    }

    #[test]
    fn test_search_url_encodes_query_and_language() {
        let client = client().with_language(Some("es-ES".to_string()));
        let url = client.endpoint_url(SEARCH_PATH, Some("the dark knight"), 1).unwrap();

        assert_eq!(url.path(), "/3/search/movie");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("query".to_string(), "the dark knight".to_string())));
        assert!(pairs.contains(&("language".to_string(), "es-ES".to_string())));
    }

    #[test]
    fn test_empty_api_key_is_config_error() {
        let err = HttpCatalogClient::new("https://api.example.test/3/", " ", Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, FilmshelfError::Config(_)));
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_network() {
        let err = client().search_page("   ", 1).await.unwrap_err();
        assert!(matches!(err, FilmshelfError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_page_zero_rejected_before_network() {
        let err = client().fetch_page(0).await.unwrap_err();
        assert!(matches!(err, FilmshelfError::InvalidRequest(_)));
    }
}
