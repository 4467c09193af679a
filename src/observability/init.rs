//! Tracing initialization and subscriber setup.
//!
//! This module configures the `tracing-subscriber` pipeline that turns the
//! crate's `tracing` events and spans into lines in a rotating log file.

use super::file_writer::FileWriter;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the data directory.
pub const LOG_FILE_NAME: &str = "filmshelf.log";

/// Initializes the tracing subscriber with rotating file output.
///
/// # Trace Level Resolution
///
/// Level is determined by:
/// 1. `RUST_LOG` environment variable (highest priority)
/// 2. `config.trace_level`
///
/// # File Location
///
/// Logs are written to `<data_dir>/filmshelf.log`, rotating at 10 MB with three
/// backups.
///
/// # Initialization Behavior
///
/// - Creates data directory if it doesn't exist
/// - Silently fails if directory creation fails (logging is optional)
/// - Idempotent: Safe to call multiple times (only first call takes effect)
///
/// # Example
///
/// ```rust
/// use filmshelf::observability::init_tracing;
/// use filmshelf::Config;
///
/// let config = Config {
///     trace_level: "debug".to_string(),
///     data_dir: Some(std::env::temp_dir().join("filmshelf-doc")),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let data_dir = config.resolved_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.trace_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = FileWriter::new(data_dir.join(LOG_FILE_NAME));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true),
    );

    let _ = subscriber.try_init();
}
