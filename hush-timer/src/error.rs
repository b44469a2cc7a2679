use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the timer controller, reconciler, and launchd management.
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The detached reblock process could not be created. The unblock is
    /// still granted at the file level; durability then depends entirely on
    /// the daemon's next tick.
    #[error("failed to spawn reblock timer ({program}): {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store error: {0}")]
    Store(#[from] hush_core::StoreError),

    #[error("hosts error: {0}")]
    Hosts(#[from] hush_hosts::HostsError),

    #[error("launchd error: {0}")]
    Launchd(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> TimerError {
    TimerError::Io {
        path: path.into(),
        source,
    }
}
