use std::path::{Path, PathBuf};
use std::time::Duration;

use hush_core::paths::{logs_dir, run_dir};
use hush_core::SiteSlug;

pub const DAEMON_LABEL: &str = "dev.hush.daemon";

/// Default gap between reconciler ticks. One lost timer is recovered within
/// at most one interval after its persisted expiry.
pub const RECONCILE_INTERVAL: Duration = Duration::from_secs(60);

pub const DAEMON_STDOUT_LOG: &str = "daemon.log";
pub const DAEMON_STDERR_LOG: &str = "daemon-err.log";

/// `<home>/.hush/run/<slug>.pid` — the per-site timer marker.
pub fn marker_path(home: &Path, slug: &SiteSlug) -> PathBuf {
    run_dir(home).join(format!("{}.pid", slug.0))
}

pub fn stdout_log_path(home: &Path) -> PathBuf {
    logs_dir(home).join(DAEMON_STDOUT_LOG)
}

pub fn stderr_log_path(home: &Path) -> PathBuf {
    logs_dir(home).join(DAEMON_STDERR_LOG)
}

pub fn launch_agents_dir(home: &Path) -> PathBuf {
    home.join("Library").join("LaunchAgents")
}

pub fn launchd_plist_path(home: &Path) -> PathBuf {
    launch_agents_dir(home).join(format!("{DAEMON_LABEL}.plist"))
}
