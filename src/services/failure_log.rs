use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only record of unsolved captchas
///
/// One line per failure: `<RFC 3339 timestamp>\t<identifier>`.
pub struct FailureLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FailureLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a failure record. Write errors are logged and swallowed so
    /// they never change a solve result.
    pub fn record(&self, identifier: &str) {
        let _guard = self.write_lock.lock();
        let line = format!("{}\t{}\n", chrono::Utc::now().to_rfc3339(), identifier);

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        match result {
            Ok(()) => tracing::debug!(path = ?self.path, identifier, "unsolved captcha logged"),
            Err(e) => tracing::warn!(path = ?self.path, "Failed to write failure log: {}", e),
        }
    }
}
