//! Filesystem locations for filmshelf data.
//!
//! The data directory holds the favorites database (or JSON document) and the
//! rotating log file. It defaults to the platform data directory, e.g.
//! `~/.local/share/filmshelf` on Linux.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "filmshelf";

/// Returns the default data directory for filmshelf storage.
///
/// Falls back to a `.filmshelf` directory under the current directory when the
/// platform exposes no data directory.
///
/// # Examples
///
/// ```
/// use filmshelf::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert!(data_dir.ends_with("filmshelf") || data_dir.ends_with(".filmshelf"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(".").join(format!(".{APP_DIR}")),
        |dir| dir.join(APP_DIR),
    )
}

/// Default location of the configuration file, e.g. `~/.config/filmshelf/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Expands a leading `~` to the user's home directory.
///
/// # Examples
///
/// ```
/// use filmshelf::infrastructure::expand_tilde;
/// use std::path::Path;
///
/// assert_eq!(expand_tilde(Path::new("/absolute/path")), Path::new("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
