//! Background worker for catalog fetches and favorites writes.
//!
//! The session stays responsive by handing every effect to the worker as a
//! message and consuming the outcome later as an event.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::CatalogWorker;
pub use messages::{PageRequest, WorkerMessage, WorkerResponse};
