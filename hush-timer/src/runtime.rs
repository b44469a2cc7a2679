//! Daemon runtime: the periodic reconciliation loop.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use hush_core::paths::{logs_dir, run_dir, state_dir};

use crate::error::{io_err, TimerError};
use crate::log_rotation;
use crate::reconciler;

/// Run the reconciler loop on the current thread until interrupted.
///
/// Sets up tracing and a tokio runtime, then ticks every `interval`. The
/// first tick fires immediately, so blocks lost across a reboot are restored
/// as soon as the daemon comes up.
pub fn start_blocking(
    home: &Path,
    hosts_path: &Path,
    interval: Duration,
) -> Result<(), TimerError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(home.to_path_buf(), hosts_path.to_path_buf(), interval))
}

async fn run(home: PathBuf, hosts_path: PathBuf, interval: Duration) -> Result<(), TimerError> {
    ensure_runtime_dirs(&home)?;
    tracing::info!(
        hosts = %hosts_path.display(),
        interval_secs = interval.as_secs(),
        "hush reconciler started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                log_rotation::rotate_logs(&home);
                match reconciler::tick_at(&home, &hosts_path, chrono::Utc::now()) {
                    Ok(outcome) if !outcome.reblocked.is_empty() => {
                        let slugs: Vec<String> =
                            outcome.reblocked.iter().map(ToString::to_string).collect();
                        tracing::info!(reblocked = ?slugs, pending = outcome.pending, "tick");
                    }
                    Ok(outcome) => {
                        tracing::debug!(pending = outcome.pending, failed = outcome.failed, "tick");
                    }
                    Err(err) => tracing::error!(error = %err, "tick failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break;
            }
        }
    }
    Ok(())
}

fn ensure_runtime_dirs(home: &Path) -> Result<(), TimerError> {
    for dir in [state_dir(home), run_dir(home), logs_dir(home)] {
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        }
    }
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
