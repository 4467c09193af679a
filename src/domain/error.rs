//! Error types for the filmshelf catalog core.
//!
//! This module defines the centralized error type [`FilmshelfError`] and a type alias
//! [`Result`] used throughout the crate. Errors are implemented with `thiserror`.
//!
//! The catalog session never lets these escape to its caller: fetch and favorite
//! failures are logged and the affected operation becomes a no-op. They do surface
//! from the lower layers (client, storage, configuration) so those can be tested
//! and composed directly.

use thiserror::Error;

/// The main error type for filmshelf operations.
///
/// # Examples
///
/// ```
/// use filmshelf::FilmshelfError;
///
/// fn require_title(title: Option<&str>) -> Result<&str, FilmshelfError> {
///     title.ok_or_else(|| FilmshelfError::Decode("missing field `title`".to_string()))
/// }
///
/// assert!(require_title(None).is_err());
/// ```
#[derive(Debug, Error)]
pub enum FilmshelfError {
    /// The remote catalog could not be reached or answered with a non-success status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A catalog response could not be mapped onto catalog items.
    ///
    /// Raised for bodies that are not JSON page objects and for items missing a
    /// required field such as `id` or `title`.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A favorites storage operation failed.
    #[error("Storage error: {0}")]
    Store(String),

    /// The SQLite backend reported an error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A catalog request was rejected before reaching the network.
    ///
    /// Empty search queries and page zero end up here.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A background task failed to complete.
    #[error("Worker error: {0}")]
    Worker(String),
}

impl From<reqwest::Error> for FilmshelfError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry the API key.
        let err = err.without_url();
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// A specialized `Result` type for filmshelf operations.
pub type Result<T> = std::result::Result<T, FilmshelfError>;
