//! Storage layer for locally persisted favorites.
//!
//! Favorites are snapshots of catalog items kept on disk so they can be shown
//! offline. The layer is split into a synchronous backend trait with two
//! implementations and an async, observable wrapper used by the session.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `sqlite`: SQLite table with versioned schema migrations (default)
//! - `json`: JSON file-based storage implementation
//! - `store`: Async wrapper publishing favorites snapshots
//! - `models`: Storage record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use backend::Storage;
pub use json::JsonStorage;
pub use models::FavoriteRecord;
pub use sqlite::SqliteStorage;
pub use store::FavoritesStore;
