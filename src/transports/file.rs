//! File transport implementation

use crate::core::{LogEntry, LoggerError, Result, Transport};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends each formatted line, plus a newline, to a file
///
/// The parent directory is created on construction if missing. The file is
/// opened in append mode and every line goes out in a single write while
/// holding the handle's mutex and, with the `file` feature, an exclusive
/// advisory lock, so concurrent writers never interleave partial lines.
///
/// Writes always target the configured path: when the file there has been
/// deleted or replaced (for example by an external log rotator), the handle
/// is reopened before the next line is written.
pub struct FileTransport {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileTransport {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "creating log directory",
                    parent.display().to_string(),
                    e,
                )
            })?;
        }

        let file = open_append(&path, "opening log file")?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    /// Swap in a fresh handle if the open one no longer backs `path`
    fn reopen_if_replaced(&self, file: &mut File) -> Result<()> {
        if is_replaced(&self.path, file) {
            *file = open_append(&self.path, "reopening log file")?;
        }
        Ok(())
    }
}

fn open_append(path: &Path, operation: &str) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggerError::io_operation(operation, path.display().to_string(), e))
}

#[cfg(unix)]
fn is_replaced(path: &Path, file: &File) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(path), file.metadata()) {
        (Ok(on_disk), Ok(open)) => on_disk.dev() != open.dev() || on_disk.ino() != open.ino(),
        _ => true,
    }
}

#[cfg(not(unix))]
fn is_replaced(path: &Path, _file: &File) -> bool {
    !path.exists()
}

impl Transport for FileTransport {
    fn send(&self, _entry: &LogEntry, formatted: &str) -> Result<()> {
        let mut line = String::with_capacity(formatted.len() + 1);
        line.push_str(formatted);
        line.push('\n');

        let mut file = self.file.lock();
        self.reopen_if_replaced(&mut file)?;

        #[cfg(feature = "file")]
        fs2::FileExt::lock_exclusive(&*file).map_err(|_| LoggerError::file_lock(self.path_str()))?;

        let result = file
            .write_all(line.as_bytes())
            .map_err(|e| LoggerError::file_transport(self.path_str(), e.to_string()));

        #[cfg(feature = "file")]
        let result = result.and(fs2::FileExt::unlock(&*file).map_err(|e| {
            LoggerError::file_transport(self.path_str(), format!("unlocking: {}", e))
        }));

        result
    }

    fn flush(&self) -> Result<()> {
        self.file
            .lock()
            .flush()
            .map_err(|e| LoggerError::file_transport(self.path_str(), e.to_string()))
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileTransport {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
