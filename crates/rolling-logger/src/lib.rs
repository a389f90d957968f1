//! Rolling File Logger
//!
//! Installs a `tracing` subscriber that writes to `<dir>/<app>.log` and
//! rotates the file once it grows past a size limit. Older files are shifted
//! to `<app>.1.log`, `<app>.2.log`, ... and the oldest one is dropped, so the
//! directory never holds more than `max_files` logs.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Size at which the active log file is rotated.
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;

/// Number of log files kept, the active one included.
pub const DEFAULT_MAX_FILES: usize = 5;

static INSTALLED: OnceLock<RollingWriter> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("log file error: {0}")]
    Io(#[from] io::Error),
    #[error("a global logger is already installed: {0}")]
    AlreadyInitialized(String),
    #[error("logger not initialized")]
    NotInitialized,
}

struct RollingFile {
    dir: PathBuf,
    stem: String,
    max_bytes: u64,
    max_files: usize,
    file: File,
    written: u64,
}

impl RollingFile {
    fn open(dir: &Path, stem: &str, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{stem}.log"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir: dir.to_path_buf(),
            stem: stem.to_string(),
            max_bytes,
            max_files: max_files.max(1),
            file,
            written,
        })
    }

    fn path_for(&self, generation: usize) -> PathBuf {
        if generation == 0 {
            self.dir.join(format!("{}.log", self.stem))
        } else {
            self.dir.join(format!("{}.{}.log", self.stem, generation))
        }
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let oldest = self.max_files - 1;
        if oldest == 0 {
            self.file = File::create(self.path_for(0))?;
            self.written = 0;
            return Ok(());
        }

        let doomed = self.path_for(oldest);
        if doomed.exists() {
            fs::remove_file(&doomed)?;
        }
        for generation in (0..oldest).rev() {
            let from = self.path_for(generation);
            if from.exists() {
                fs::rename(&from, self.path_for(generation + 1))?;
            }
        }

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(0))?;
        self.written = 0;
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }
}

/// Cloneable handle to a rotating log file.
#[derive(Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<RollingFile>>,
}

impl RollingWriter {
    pub fn new(
        dir: impl AsRef<Path>,
        app_name: &str,
        max_bytes: u64,
        max_files: usize,
    ) -> Result<Self, LoggerError> {
        let file = RollingFile::open(dir.as_ref(), app_name, max_bytes, max_files)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(file)),
        })
    }

    /// Path of the file currently being written.
    pub fn active_path(&self) -> PathBuf {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.path_for(0)
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the rolling logger as the global subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. `log` records
/// are bridged into the same subscriber.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    let mut writer = RollingWriter::new(log_dir, app_name, DEFAULT_MAX_BYTES, DEFAULT_MAX_FILES)?;
    writeln!(
        writer,
        "==== {} started {} ====",
        app_name,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
    )?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer.clone())
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))?;

    let _ = INSTALLED.set(writer);
    Ok(())
}

/// Log an info line through the installed logger.
pub fn info(msg: &str) -> Result<(), LoggerError> {
    INSTALLED.get().ok_or(LoggerError::NotInitialized)?;
    log::info!(target: "rolling_logger", "{}", msg);
    Ok(())
}

/// Log an error line through the installed logger.
pub fn error(msg: &str) -> Result<(), LoggerError> {
    INSTALLED.get().ok_or(LoggerError::NotInitialized)?;
    log::error!(target: "rolling_logger", "{}", msg);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }

    #[test]
    fn test_writes_to_active_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingWriter::new(dir.path(), "app", 1024, 3).unwrap();
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.active_path(), dir.path().join("app.log"));
        assert_eq!(read(&dir.path().join("app.log")), "hello\n");
    }

    #[test]
    fn test_rotates_past_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingWriter::new(dir.path(), "app", 10, 3).unwrap();
        writer.write_all(b"first-line\n").unwrap();
        writer.write_all(b"second\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(read(&dir.path().join("app.1.log")), "first-line\n");
        assert_eq!(read(&dir.path().join("app.log")), "second\n");
    }

    #[test]
    fn test_keeps_bounded_number_of_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingWriter::new(dir.path(), "app", 4, 3).unwrap();
        for line in ["aaaa", "bbbb", "cccc", "dddd", "eeee"] {
            writer.write_all(line.as_bytes()).unwrap();
        }
        writer.flush().unwrap();

        assert_eq!(read(&dir.path().join("app.log")), "eeee");
        assert_eq!(read(&dir.path().join("app.1.log")), "dddd");
        assert_eq!(read(&dir.path().join("app.2.log")), "cccc");
        assert!(!dir.path().join("app.3.log").exists());
    }

    #[test]
    fn test_single_file_truncates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingWriter::new(dir.path(), "app", 4, 1).unwrap();
        writer.write_all(b"old!").unwrap();
        writer.write_all(b"new!").unwrap();
        writer.flush().unwrap();

        assert_eq!(read(&dir.path().join("app.log")), "new!");
        assert!(!dir.path().join("app.1.log").exists());
    }

    #[test]
    fn test_resumes_size_of_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.log"), b"12345678").unwrap();
        let mut writer = RollingWriter::new(dir.path(), "app", 10, 2).unwrap();
        writer.write_all(b"abc").unwrap();
        writer.flush().unwrap();

        assert_eq!(read(&dir.path().join("app.1.log")), "12345678");
        assert_eq!(read(&dir.path().join("app.log")), "abc");
    }

    #[test]
    fn test_helpers_require_installed_logger() {
        // No test in this crate installs the global logger.
        assert!(matches!(info("x"), Err(LoggerError::NotInitialized)));
        assert!(matches!(error("x"), Err(LoggerError::NotInitialized)));
    }
}
