//! Error types for hush-hosts.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from hosts-file operations.
///
/// Read/write failures are fatal to the current operation and are never
/// retried here — retrying a mid-failure write could double-apply lines.
/// Ownership-restore failures are deliberately *not* represented: they are
/// logged and swallowed inside the write path.
#[derive(Debug, Error)]
pub enum HostsError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`HostsError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> HostsError {
    HostsError::Io {
        path: path.into(),
        source,
    }
}
