//! Actions representing side effects to be executed by the session runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event. It
//! never performs I/O itself; the [`CatalogSession`](crate::CatalogSession)
//! executes these actions and feeds their outcomes back as events.
//!
//! # Example
//!
//! ```rust
//! use filmshelf::app::Action;
//! use filmshelf::worker::{PageRequest, WorkerMessage};
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::fetch_page(PageRequest::new(0, "", 1))),
//! ];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::worker::WorkerMessage;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Posts a message to the background worker.
    ///
    /// The worker's response comes back as
    /// [`Event::WorkerResponse`](crate::app::Event::WorkerResponse).
    PostToWorker(WorkerMessage),
}
