//! `hush daemon` — reconciler lifecycle and launchd management.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};

use hush_core::paths as core_paths;
use hush_timer::paths::{stderr_log_path, stdout_log_path, RECONCILE_INTERVAL};
use hush_timer::{install_launchd, reconciler, start_blocking, uninstall_launchd};

#[derive(Subcommand, Debug)]
pub enum DaemonCommand {
    /// Run the reconciler loop in the foreground.
    Start(DaemonStartArgs),
    /// Run exactly one reconciliation pass and exit (cron-friendly).
    Tick,
    /// Install and bootstrap the launchd agent.
    Install,
    /// Boot out and remove the launchd agent.
    Uninstall,
    /// Print recent daemon log lines.
    Logs(DaemonLogsArgs),
}

#[derive(Args, Debug)]
pub struct DaemonStartArgs {
    /// Seconds between reconciliation passes.
    #[arg(long, default_value_t = RECONCILE_INTERVAL.as_secs())]
    pub interval_secs: u64,
}

#[derive(Args, Debug)]
pub struct DaemonLogsArgs {
    /// Number of trailing lines to show.
    #[arg(long, default_value_t = 100)]
    pub lines: usize,

    /// Show only the stderr log file.
    #[arg(long)]
    pub stderr_only: bool,
}

pub fn run(command: DaemonCommand) -> Result<()> {
    let home = super::home()?;
    let hosts = core_paths::hosts_path();

    match command {
        DaemonCommand::Start(args) => {
            start_blocking(&home, &hosts, Duration::from_secs(args.interval_secs))
                .context("daemon exited with error")?;
        }
        DaemonCommand::Tick => {
            let outcome = reconciler::tick_at(&home, &hosts, Utc::now())
                .context("reconciliation pass failed")?;
            if outcome.reblocked.is_empty() {
                println!(
                    "nothing to do ({} open window(s), {} failure(s))",
                    outcome.pending, outcome.failed
                );
            } else {
                for slug in &outcome.reblocked {
                    println!("reblocked {slug}");
                }
            }
        }
        DaemonCommand::Install => {
            let path = install_launchd(&home).context("failed to install launchd agent")?;
            println!("installed launchd agent: {}", path.display());
        }
        DaemonCommand::Uninstall => {
            uninstall_launchd(&home).context("failed to uninstall launchd agent")?;
            println!("uninstalled launchd agent");
        }
        DaemonCommand::Logs(args) => {
            let mut files = Vec::new();
            if !args.stderr_only {
                files.push(stdout_log_path(&home));
            }
            files.push(stderr_log_path(&home));

            for path in files {
                if !path.exists() {
                    println!("(no log at {})", path.display());
                    continue;
                }
                println!("==> {} <==", path.display());
                for line in tail_lines(&path, args.lines)? {
                    println!("{line}");
                }
            }
        }
    }
    Ok(())
}

fn tail_lines(path: &std::path::Path, count: usize) -> Result<Vec<String>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut window: VecDeque<String> = VecDeque::with_capacity(count);
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if window.len() == count {
            window.pop_front();
        }
        window.push_back(line);
    }
    Ok(window.into_iter().collect())
}
