//! Best-effort run log with size-based rotation.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

/// Rotate once the file grows past this many bytes.
const MAX_LOG_BYTES: u64 = 10 * 1024;

/// Lines retained by a rotation.
const ROTATE_KEEP_LINES: usize = 100;

/// Timestamped append-only log invoked at every pipeline step boundary.
///
/// Logging is best effort: every I/O failure is downgraded to a tracing
/// warning, so a full disk or unwritable path never aborts a run. There
/// is no locking against concurrent writers.
pub struct RunLogger {
    path: PathBuf,
}

impl RunLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append a timestamped line, then rotate if the file has grown
    /// past the size threshold.
    pub fn log(&self, message: &str) {
        if let Err(e) = self.append(message) {
            tracing::warn!("Run log append failed: {}", e);
            return;
        }
        if let Err(e) = self.maybe_rotate() {
            tracing::warn!("Run log rotation failed: {}", e);
        }
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{}] {}", stamp, message)
    }

    fn maybe_rotate(&self) -> std::io::Result<()> {
        if fs::metadata(&self.path)?.len() <= MAX_LOG_BYTES {
            return Ok(());
        }

        let content = fs::read_to_string(&self.path)?;
        let lines: Vec<&str> = content.lines().collect();
        let keep_from = lines.len().saturating_sub(ROTATE_KEEP_LINES);
        let mut rotated = lines[keep_from..].join("\n");
        rotated.push('\n');
        fs::write(&self.path, rotated)
    }
}
