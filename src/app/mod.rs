//! Application layer coordinating state, events, and actions.
//!
//! This module is the pure core of the catalog session. It owns no tasks and
//! performs no I/O: [`handle_event`] mutates an [`AppState`] and returns the
//! side effects to run. The runtime in [`crate::session`] executes them.
//!
//! # Architecture
//!
//! ```text
//! Intents → Events → Event Handler → State Mutations → Actions → Worker
//!                         ↑                                        ↓
//!                         └──────────── Worker Responses ──────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: The fetch busy guard
//! - [`snapshot`]: Immutable copies of the state for observers
//! - [`state`]: Central session state container
//!
//! # Example
//!
//! ```rust
//! use filmshelf::app::{handle_event, Action, AppState, Event};
//!
//! let mut state = AppState::default();
//! let (changed, actions) = handle_event(&mut state, &Event::LoadMore)?;
//! assert!(changed);
//! assert!(matches!(actions.as_slice(), [Action::PostToWorker(_)]));
//! # Ok::<(), filmshelf::FilmshelfError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod snapshot;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::FetchState;
pub use snapshot::SessionSnapshot;
pub use state::{AppState, SessionOptions};
