//! Domain layer for the filmshelf catalog core.
//!
//! This module contains the core domain types, independent of the HTTP transport
//! and of the persistence backends.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`movie`]: Catalog item model
//!
//! # Examples
//!
//! ```
//! use filmshelf::domain::{CatalogItem, Result};
//!
//! fn first_item() -> Result<CatalogItem> {
//!     Ok(CatalogItem::new(603, "The Matrix"))
//! }
//! ```

pub mod error;
pub mod movie;

pub use error::{FilmshelfError, Result};
pub use movie::CatalogItem;
