//! Infrastructure layer for filesystem and environment interactions.
//!
//! - `paths`: platform data and config locations
//! - `connectivity`: the online/offline signal injected into sessions

pub mod connectivity;
pub mod paths;

pub use connectivity::{AlwaysOnline, Connectivity, ConnectivityFlag};
pub use paths::{default_config_path, expand_tilde, get_data_dir};
