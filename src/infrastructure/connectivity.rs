//! Connectivity signal consumed by the catalog session.
//!
//! Detecting connectivity is the host's job. The session only asks a
//! [`Connectivity`] implementation for the current boolean before each fetch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Reports online unconditionally. Used by the command-line front end.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// A shared toggle the host flips as its network monitor reports changes.
///
/// Clones observe the same flag.
///
/// # Examples
///
/// ```
/// use filmshelf::infrastructure::{Connectivity, ConnectivityFlag};
///
/// let flag = ConnectivityFlag::new(true);
/// let observer = flag.clone();
/// flag.set_online(false);
/// assert!(!observer.is_online());
/// ```
#[derive(Debug, Clone)]
pub struct ConnectivityFlag {
    online: Arc<AtomicBool>,
}

impl ConnectivityFlag {
    #[must_use]
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
