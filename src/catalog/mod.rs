//! Remote catalog access.
//!
//! - `client`: the [`CatalogApi`] seam and its HTTP implementation
//! - `response`: wire format decoding into [`CatalogItem`](crate::CatalogItem)

pub mod client;
pub mod response;

pub use client::{CatalogApi, HttpCatalogClient};
pub use response::decode_page;
