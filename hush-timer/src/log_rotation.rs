//! Size-based rotation for the daemon log files.
//!
//! launchd appends to `daemon.log` / `daemon-err.log` indefinitely; the
//! daemon rotates them itself once they pass 10 MiB, keeping at most 5
//! numbered copies (`daemon.log.1` is the newest backup).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Rotation threshold (10 MiB).
pub const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Number of rotated backups retained.
pub const MAX_ROTATED_FILES: usize = 5;

/// Rotate `log_path` if it exceeds `max_bytes`.
///
/// Shifts `<name>.n` → `<name>.n+1` (dropping the oldest), moves the live
/// file to `<name>.1`, and recreates an empty live file. Returns whether a
/// rotation happened; a missing live file is not an error.
pub fn rotate_if_needed(log_path: &Path, max_bytes: u64, max_files: usize) -> io::Result<bool> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    if size < max_bytes {
        return Ok(false);
    }

    let oldest = numbered_path(log_path, max_files);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for n in (1..max_files).rev() {
        let src = numbered_path(log_path, n);
        if src.exists() {
            fs::rename(&src, numbered_path(log_path, n + 1))?;
        }
    }
    fs::rename(log_path, numbered_path(log_path, 1))?;

    // Recreate the live file so launchd always has a writable target.
    fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(log_path)?;

    Ok(true)
}

/// Rotate both daemon logs under `home`; per-file failures are logged and do
/// not block the other file.
pub fn rotate_logs(home: &Path) {
    for log_path in [
        crate::paths::stdout_log_path(home),
        crate::paths::stderr_log_path(home),
    ] {
        match rotate_if_needed(&log_path, MAX_LOG_BYTES, MAX_ROTATED_FILES) {
            Ok(true) => tracing::info!(path = %log_path.display(), "log file rotated"),
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(path = %log_path.display(), error = %err, "log rotation failed");
            }
        }
    }
}

fn numbered_path(base: &Path, n: usize) -> PathBuf {
    let name = base
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(crate::paths::DAEMON_STDOUT_LOG);
    base.with_file_name(format!("{name}.{n}"))
}
