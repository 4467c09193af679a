//! Rotating log file writer with size-based rotation and backup retention.
//!
//! [`FileWriter`] is handed to `tracing-subscriber` as its writer. When the log
//! grows past the size threshold it is shifted to `<name>.1`, existing backups
//! move up by one, and anything beyond the retention limit is removed.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

struct Inner {
    file: Option<File>,
    /// Bytes in the current file, including what was there when it was opened.
    size: u64,
}

/// Thread-safe rotating file writer.
///
/// Cloning is cheap and every clone appends to the same file. The file is not
/// opened until the first write, so construction never fails.
#[derive(Clone)]
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    backups: usize,
    inner: Arc<Mutex<Inner>>,
}

impl FileWriter {
    pub fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    pub fn with_limits(file_path: PathBuf, max_bytes: u64, backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            backups,
            inner: Arc::new(Mutex::new(Inner { file: None, size: 0 })),
        }
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.file_path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn open(path: &Path) -> io::Result<(File, u64)> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok((file, size))
    }

    /// Shifts `<name>` to `<name>.1`, `<name>.1` to `<name>.2`, and so on,
    /// dropping the oldest backup.
    fn rotate(&self, inner: &mut Inner) -> io::Result<()> {
        inner.file = None;

        if self.backups == 0 {
            fs::remove_file(&self.file_path)?;
        } else {
            let oldest = self.backup_path(self.backups);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (1..self.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            fs::rename(&self.file_path, self.backup_path(1))?;
        }

        inner.size = 0;
        Ok(())
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;

        if inner.file.is_some() && inner.size > 0 && inner.size + buf.len() as u64 > self.max_bytes {
            self.rotate(&mut inner)?;
        }

        if inner.file.is_none() {
            let (file, size) = Self::open(&self.file_path)?;
            inner.file = Some(file);
            inner.size = size;
        }

        let file = inner
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No file available"))?;
        file.write_all(buf)?;
        inner.size += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;
        match inner.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}
