//! Body of the detached timer process.
//!
//! The worker sleeps until its deadline, re-applies the block for its site,
//! and removes its own pid marker. It sleeps in bounded increments and
//! re-checks wall-clock time on every wakeup, so a machine that sleeps
//! through the deadline still reblocks promptly on resume instead of
//! honoring a stale monotonic duration.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};

use hush_core::SiteSlug;

use crate::controller;
use crate::error::TimerError;
use crate::reblock;

/// Longest single sleep between wall-clock checks.
const MAX_SLEEP_SLICE: Duration = Duration::from_secs(60);

/// Sleep until `deadline`, then reblock `slug` and clean up the marker.
pub fn run(
    home: &Path,
    hosts_path: &Path,
    slug: &SiteSlug,
    deadline: DateTime<Utc>,
) -> Result<(), TimerError> {
    let my_pid = std::process::id();
    tracing::debug!(slug = %slug, pid = my_pid, deadline = %deadline, "timer worker started");

    loop {
        let now = Utc::now();
        if now >= deadline {
            break;
        }
        let remaining = (deadline - now).to_std().unwrap_or(Duration::ZERO);
        std::thread::sleep(remaining.min(MAX_SLEEP_SLICE));
    }

    reblock::reblock_site_at(home, hosts_path, slug)?;

    // Only remove the marker if it still belongs to this process; a newer
    // timer may have superseded this one while it slept.
    controller::remove_marker_if_owned_at(home, slug, my_pid)?;
    Ok(())
}
