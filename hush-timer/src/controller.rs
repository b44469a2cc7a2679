//! Per-site timer process controller.
//!
//! One detached reblock process may exist per site, tracked through a pid
//! marker at `~/.hush/run/<slug>.pid`. Starting a timer first force-stops
//! any prior timer for the same slug; the marker is removed either by an
//! explicit [`kill_at`] or by the spawned process itself once its reblock
//! completes.

use std::path::Path;
use std::process::{Command, Stdio};

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use serde::Serialize;

use hush_core::paths::run_dir;
use hush_core::SiteSlug;

use crate::error::{io_err, TimerError};
use crate::paths::marker_path;

/// Result of probing a site's timer marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerStatus {
    pub pid: Option<u32>,
    pub running: bool,
}

/// Result of a best-effort kill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KillOutcome {
    pub killed: bool,
    pub pid: Option<u32>,
}

/// Spawn a detached timer process for `slug` and persist its pid marker.
///
/// Force-stops any existing timer for the same slug first, so at most one
/// in-flight reblock timer exists per site. The child is placed in its own
/// process group with stdio detached and is never waited on; this call
/// returns as soon as the spawn succeeds.
pub fn start_at(home: &Path, slug: &SiteSlug, command: &mut Command) -> Result<u32, TimerError> {
    kill_at(home, slug)?;

    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    detach(command);

    let program = command.get_program().to_string_lossy().into_owned();
    let child = command
        .spawn()
        .map_err(|source| TimerError::Spawn { program, source })?;
    let pid = child.id();

    if let Err(err) = write_marker_at(home, slug, pid) {
        // Without a marker the timer cannot be tracked or superseded.
        if let Err(kill_err) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            tracing::warn!(pid, %kill_err, "failed to stop untrackable timer");
        }
        return Err(err);
    }

    tracing::debug!(slug = %slug, pid, "reblock timer armed");
    Ok(pid)
}

/// Read the marker and probe the recorded process with a no-op signal.
///
/// A "permission denied" probe means the process exists under another
/// privilege level and counts as running — a false negative here would cause
/// premature reblocking or duplicate timers.
pub fn status_at(home: &Path, slug: &SiteSlug) -> Result<TimerStatus, TimerError> {
    let Some(pid) = read_marker_at(home, slug)? else {
        return Ok(TimerStatus {
            pid: None,
            running: false,
        });
    };
    Ok(TimerStatus {
        pid: Some(pid),
        running: probe(pid),
    })
}

/// Best-effort terminate the timer for `slug` and remove its marker.
///
/// Killing a non-existent timer is not an error: the outcome simply reports
/// `killed: false`.
pub fn kill_at(home: &Path, slug: &SiteSlug) -> Result<KillOutcome, TimerError> {
    let Some(pid) = read_marker_at(home, slug)? else {
        return Ok(KillOutcome {
            killed: false,
            pid: None,
        });
    };

    let killed = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok();
    remove_marker_at(home, slug)?;

    if killed {
        tracing::debug!(slug = %slug, pid, "reblock timer killed");
    }
    Ok(KillOutcome {
        killed,
        pid: Some(pid),
    })
}

/// Remove the marker for `slug`, but only if it still records `pid`.
///
/// Used by the worker process to clean up after itself without clobbering a
/// newer timer that may have superseded it.
pub fn remove_marker_if_owned_at(
    home: &Path,
    slug: &SiteSlug,
    pid: u32,
) -> Result<(), TimerError> {
    if read_marker_at(home, slug)? == Some(pid) {
        remove_marker_at(home, slug)?;
    }
    Ok(())
}

fn probe(pid: u32) -> bool {
    match signal::kill(Pid::from_raw(pid as i32), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

fn write_marker_at(home: &Path, slug: &SiteSlug, pid: u32) -> Result<(), TimerError> {
    let dir = run_dir(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
    }
    let path = marker_path(home, slug);
    std::fs::write(&path, format!("{pid}\n")).map_err(|e| io_err(&path, e))
}

/// `Ok(None)` when no marker exists or its content is not a pid (a corrupt
/// marker is removed and treated as "no timer").
fn read_marker_at(home: &Path, slug: &SiteSlug) -> Result<Option<u32>, TimerError> {
    let path = marker_path(home, slug);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    // Kernel pids are positive and fit an i32; anything outside that range
    // would alias a signal target like -1 (every signalable process) after
    // the cast below, so it is discarded the same way as non-numeric text.
    match contents.trim().parse::<i32>() {
        Ok(pid) if pid > 0 => Ok(Some(pid as u32)),
        _ => {
            tracing::warn!(path = %path.display(), "discarding unreadable timer marker");
            std::fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
            Ok(None)
        }
    }
}

fn remove_marker_at(home: &Path, slug: &SiteSlug) -> Result<(), TimerError> {
    let path = marker_path(home, slug);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(io_err(&path, err)),
    }
}

#[cfg(unix)]
fn detach(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn detach(_command: &mut Command) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sleeper() -> Command {
        let mut cmd = Command::new("sleep");
        cmd.arg("60");
        cmd
    }

    #[test]
    fn status_without_marker_is_idle() {
        let home = TempDir::new().unwrap();
        let status = status_at(home.path(), &SiteSlug::from("reddit")).unwrap();
        assert_eq!(
            status,
            TimerStatus {
                pid: None,
                running: false
            }
        );
    }

    #[test]
    fn start_writes_marker_and_reports_running() {
        let home = TempDir::new().unwrap();
        let slug = SiteSlug::from("reddit");

        let pid = start_at(home.path(), &slug, &mut sleeper()).unwrap();
        let marker = std::fs::read_to_string(marker_path(home.path(), &slug)).unwrap();
        assert_eq!(marker.trim(), pid.to_string());

        let status = status_at(home.path(), &slug).unwrap();
        assert_eq!(status.pid, Some(pid));
        assert!(status.running);

        kill_at(home.path(), &slug).unwrap();
    }

    #[test]
    fn second_start_supersedes_first_timer() {
        let home = TempDir::new().unwrap();
        let slug = SiteSlug::from("reddit");

        let first = start_at(home.path(), &slug, &mut sleeper()).unwrap();
        let second = start_at(home.path(), &slug, &mut sleeper()).unwrap();
        assert_ne!(first, second);

        // Exactly one marker per site, recording the newest timer only.
        let marker = std::fs::read_to_string(marker_path(home.path(), &slug)).unwrap();
        assert_eq!(marker.trim(), second.to_string());
        let markers = std::fs::read_dir(run_dir(home.path())).unwrap().count();
        assert_eq!(markers, 1);

        kill_at(home.path(), &slug).unwrap();
    }

    #[test]
    fn kill_removes_marker_and_reports_pid() {
        let home = TempDir::new().unwrap();
        let slug = SiteSlug::from("youtube");

        let pid = start_at(home.path(), &slug, &mut sleeper()).unwrap();
        let outcome = kill_at(home.path(), &slug).unwrap();
        assert!(outcome.killed);
        assert_eq!(outcome.pid, Some(pid));
        assert!(!marker_path(home.path(), &slug).exists());
    }

    #[test]
    fn kill_without_timer_is_not_an_error() {
        let home = TempDir::new().unwrap();
        let outcome = kill_at(home.path(), &SiteSlug::from("nope")).unwrap();
        assert_eq!(
            outcome,
            KillOutcome {
                killed: false,
                pid: None
            }
        );
    }

    #[test]
    fn stale_marker_for_dead_process_reports_not_running() {
        let home = TempDir::new().unwrap();
        let slug = SiteSlug::from("reddit");
        std::fs::create_dir_all(run_dir(home.path())).unwrap();
        // Far above any realistic pid_max, so the probe sees ESRCH.
        std::fs::write(marker_path(home.path(), &slug), "2147483646\n").unwrap();

        let status = status_at(home.path(), &slug).unwrap();
        assert_eq!(status.pid, Some(2147483646));
        assert!(!status.running);
    }

    #[test]
    fn corrupt_marker_is_discarded() {
        let home = TempDir::new().unwrap();
        let slug = SiteSlug::from("reddit");
        std::fs::create_dir_all(run_dir(home.path())).unwrap();
        std::fs::write(marker_path(home.path(), &slug), "not-a-pid\n").unwrap();

        let status = status_at(home.path(), &slug).unwrap();
        assert_eq!(status.pid, None);
        assert!(!marker_path(home.path(), &slug).exists());
    }

    #[test]
    fn out_of_range_marker_is_discarded() {
        let home = TempDir::new().unwrap();
        let slug = SiteSlug::from("reddit");
        std::fs::create_dir_all(run_dir(home.path())).unwrap();

        // u32::MAX would become pid -1 under a naive cast, which signals
        // every process the caller may reach.
        for bad in ["4294967295\n", "0\n", "-7\n"] {
            std::fs::write(marker_path(home.path(), &slug), bad).unwrap();
            let status = status_at(home.path(), &slug).unwrap();
            assert_eq!(status.pid, None);
            assert!(!status.running);
            assert!(!marker_path(home.path(), &slug).exists());
        }
    }

    #[test]
    fn worker_cleanup_only_removes_its_own_marker() {
        let home = TempDir::new().unwrap();
        let slug = SiteSlug::from("reddit");
        std::fs::create_dir_all(run_dir(home.path())).unwrap();
        std::fs::write(marker_path(home.path(), &slug), "4242\n").unwrap();

        // A superseded worker must leave the newer marker alone.
        remove_marker_if_owned_at(home.path(), &slug, 9999).unwrap();
        assert!(marker_path(home.path(), &slug).exists());

        remove_marker_if_owned_at(home.path(), &slug, 4242).unwrap();
        assert!(!marker_path(home.path(), &slug).exists());
    }
}
