//! Fetch state of the catalog session.
//!
//! The session's busy guard is a two-state machine:
//!
//! ```text
//!          begin_fetch (online, Idle)
//!   Idle ─────────────────────────────▶ Fetching
//!     ▲                                    │
//!     └────────────── end_fetch ───────────┘
//!          (success, failure, or stale)
//! ```
//!
//! At most one fetch is outstanding at any time.

/// Whether a page fetch is currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    /// No fetch in flight. A new one may begin.
    #[default]
    Idle,

    /// A fetch is in flight. Further load requests are dropped, not queued.
    Fetching,
}

impl FetchState {
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Fetching)
    }
}
