//! Filmshelf: a movie catalog browsing core with paginated search and offline
//! favorites.
//!
//! Filmshelf provides:
//! - Paginated listing of popular movies from a TMDB-style REST catalog
//! - Free-text search with the same paging model
//! - Favorites persisted locally (SQLite or JSON) for offline display
//! - A UI-agnostic session that publishes immutable snapshots for rendering

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Command-line front end (main.rs)                   │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Session runtime (session.rs)                       │  ← Task wiring
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! │  - Snapshot computation                             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Catalog       │   │ Storage Layer │   │ Worker Layer  │
//! │ (catalog/)    │   │ (storage/)    │   │ (worker/)     │
//! │ - HTTP client │   │ - SQLite      │   │ - Fetches     │
//! │ - Decoding    │   │ - JSON I/O    │   │ - Favorites   │
//! │               │   │ - Migrations  │   │   writes      │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Paths, connectivity (infrastructure/)            │
//! │  - Error types (domain/error)                       │
//! │  - Catalog item model (domain/movie)                │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing-subscriber with rotating file output     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Session state machine with event/action model
//! - [`catalog`]: Remote catalog client
//! - [`domain`]: Core domain types (catalog items, errors)
//! - [`infrastructure`]: Platform paths and connectivity signal
//! - [`storage`]: Favorites persistence with SQLite and JSON backends
//! - [`worker`]: Background execution of fetches and favorites writes
//! - [`observability`]: Logging setup
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/filmshelf/config.toml
//! api_key = "your-tmdb-key"
//! language = "en-US"
//! storage = "sqlite"
//! trace_level = "debug"
//! ```
//!
//! `FILMSHELF_API_KEY` in the environment overrides `api_key`.
//!
//! # Key Design Decisions
//!
//! ## One Fetch At A Time
//!
//! The session holds a busy guard while a page fetch is outstanding. Load
//! requests arriving meanwhile are dropped, not queued; a query change during a
//! fetch is remembered and served once the fetch settles.
//!
//! ## Generation-Tagged Pages
//!
//! Each page request carries the query generation it was issued under, and
//! pages from an older generation are discarded instead of being appended to
//! the results of a newer query.
//!
//! ## Failures Stay Inside
//!
//! Fetch and favorites failures are logged and leave state unchanged. No error
//! ever reaches the presentation layer.

pub mod app;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod session;
pub mod storage;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, FetchState, SessionOptions, SessionSnapshot};
pub use catalog::{CatalogApi, HttpCatalogClient};
pub use domain::{CatalogItem, FilmshelfError, Result};
pub use infrastructure::{AlwaysOnline, Connectivity, ConnectivityFlag};
pub use session::CatalogSession;
pub use storage::{FavoriteRecord, FavoritesStore};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable that overrides [`Config::api_key`].
pub const API_KEY_ENV: &str = "FILMSHELF_API_KEY";

/// Favorites persistence backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `favorites.db` in the data directory.
    #[default]
    Sqlite,
    /// `favorites.json` in the data directory.
    Json,
}

/// Filmshelf configuration, read from a TOML file.
///
/// Every field is optional in the file and falls back to its default.
///
/// # Example
///
/// ```toml
/// api_base_url = "https://api.themoviedb.org/3/"
/// api_key = "abc123"
/// request_timeout_secs = 10
/// prefetch_distance = 3
/// storage = "json"
/// data_dir = "~/movies"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the catalog REST API. Default: `https://api.themoviedb.org/3/`
    pub api_base_url: String,

    /// Static catalog API key. Required to build the HTTP client.
    pub api_key: String,

    /// Base URL for poster and backdrop images. Default: `https://image.tmdb.org/t/p/`
    pub image_base_url: String,

    /// Optional `language` parameter sent with every catalog request.
    pub language: Option<String>,

    /// Transport-level timeout for each catalog request. Default: 30
    pub request_timeout_secs: u64,

    /// Trim surrounding whitespace from search terms. Default: `true`
    pub trim_query: bool,

    /// Scroll distance from the end of the list that triggers the next page.
    /// Default: 1
    pub prefetch_distance: usize,

    pub storage: StorageBackend,

    /// Directory for favorites and logs. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,

    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub trace_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.themoviedb.org/3/".to_string(),
            api_key: String::new(),
            image_base_url: "https://image.tmdb.org/t/p/".to_string(),
            language: None,
            request_timeout_secs: 30,
            trim_query: true,
            prefetch_distance: 1,
            storage: StorageBackend::Sqlite,
            data_dir: None,
            trace_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the default location when
    /// `path` is `None`, then applies environment overrides and validates.
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns [`FilmshelfError::Config`] if the file cannot be parsed or the
    /// resulting configuration is invalid, and [`FilmshelfError::Io`] if an
    /// existing file cannot be read.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(infrastructure::default_config_path);

        let config = match path {
            Some(path) if path.exists() => {
                tracing::debug!(path = ?path, "loading configuration");
                Self::from_toml_str(&std::fs::read_to_string(&path)?)?
            }
            _ => {
                tracing::debug!("no configuration file, using defaults");
                Self::default()
            }
        };

        let config = config.with_api_key_override(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`FilmshelfError::Config`] on malformed TOML or unknown keys.
    ///
    /// # Example
    ///
    /// ```rust
    /// use filmshelf::{Config, StorageBackend};
    ///
    /// let config = Config::from_toml_str("storage = \"json\"\nprefetch_distance = 5")?;
    /// assert_eq!(config.storage, StorageBackend::Json);
    /// assert_eq!(config.prefetch_distance, 5);
    /// assert!(config.trim_query);
    /// # Ok::<(), filmshelf::FilmshelfError>(())
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FilmshelfError::Config(format!("invalid config: {e}")))
    }

    /// Replaces the API key when an override is present and non-empty.
    #[must_use]
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key;
        }
        self
    }

    /// Checks URLs and numeric limits.
    ///
    /// An empty API key is allowed here so favorites can be browsed offline; it
    /// is rejected when the HTTP client is built.
    ///
    /// # Errors
    ///
    /// Returns [`FilmshelfError::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("api_base_url", &self.api_base_url),
            ("image_base_url", &self.image_base_url),
        ] {
            reqwest::Url::parse(value)
                .map_err(|e| FilmshelfError::Config(format!("{field} {value:?} is not a URL: {e}")))?;
        }
        if self.request_timeout_secs == 0 {
            return Err(FilmshelfError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The data directory, with `~` expanded and the platform default applied.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.as_deref().map_or_else(
            infrastructure::get_data_dir,
            infrastructure::expand_tilde,
        )
    }

    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            trim_query: self.trim_query,
            prefetch_distance: self.prefetch_distance,
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Opens the configured favorites backend in the data directory.
///
/// # Errors
///
/// Returns an error if the backend cannot be opened or migrated.
pub fn open_store(config: &Config) -> Result<FavoritesStore> {
    let data_dir = config.resolved_data_dir();
    let backend: Box<dyn storage::Storage> = match config.storage {
        StorageBackend::Sqlite => Box::new(storage::SqliteStorage::open(&data_dir.join("favorites.db"))?),
        StorageBackend::Json => Box::new(storage::JsonStorage::new(data_dir.join("favorites.json"))?),
    };
    FavoritesStore::new(backend)
}

/// Builds the HTTP catalog client described by the configuration.
///
/// # Errors
///
/// Returns [`FilmshelfError::Config`] if the API key is empty or a URL is invalid.
pub fn catalog_client(config: &Config) -> Result<HttpCatalogClient> {
    Ok(HttpCatalogClient::new(
        &config.api_base_url,
        config.api_key.clone(),
        config.request_timeout(),
    )?
    .with_language(config.language.clone()))
}

/// Wires a session from configuration: HTTP catalog, configured favorites
/// backend, and an always-online connectivity signal.
///
/// # Errors
///
/// Returns an error if the catalog client or the favorites store cannot be built.
pub fn build_session(config: &Config) -> Result<CatalogSession> {
    tracing::debug!(storage = ?config.storage, "building catalog session");

    let catalog: Arc<dyn CatalogApi> = Arc::new(catalog_client(config)?);
    let favorites = open_store(config)?;

    Ok(CatalogSession::new(
        catalog,
        favorites,
        Arc::new(AlwaysOnline),
        config.session_options(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Config::from_toml_str("scan_depth = 4").unwrap_err();
        assert!(matches!(err, FilmshelfError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_timeout_and_bad_url() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            api_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FilmshelfError::Config(msg)) if msg.contains("api_base_url")));
    }

    #[test]
    fn test_api_key_override() {
        let config = Config {
            api_key: "from-file".to_string(),
            ..Default::default()
        };

        assert_eq!(config.clone().with_api_key_override(None).api_key, "from-file");
        assert_eq!(
            config.clone().with_api_key_override(Some(String::new())).api_key,
            "from-file"
        );
        assert_eq!(
            config.with_api_key_override(Some("from-env".to_string())).api_key,
            "from-env"
        );
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_open_store_json_backend() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            storage: StorageBackend::Json,
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let store = open_store(&config).unwrap();

        assert!(store.snapshot().is_empty());
        assert!(!dir.path().join("favorites.db").exists());
    }
}
