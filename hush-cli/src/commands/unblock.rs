//! `hush unblock` — lift a site's block for a bounded grace period.
//!
//! Flow: remove the site's blocking lines, persist the expiry, then arm a
//! detached reblock timer. A timer that fails to spawn downgrades to a
//! warning — the unblock stands, and the reconciler daemon closes the window
//! on its next tick after the deadline.

use std::process::Command;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Args;
use colored::Colorize;

use hush_core::{paths, sites, state, SiteSlug};
use hush_hosts::manager;
use hush_timer::controller;

#[derive(Args, Debug)]
pub struct UnblockArgs {
    /// Site slug from the catalog (see `hush site list`).
    pub site: String,

    /// Minutes until the block is re-applied (default: the site's own).
    #[arg(long)]
    pub minutes: Option<u64>,
}

impl UnblockArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let hosts = paths::hosts_path();
        let slug = SiteSlug::from(self.site);

        let site = sites::find_site_at(&home, &slug)
            .with_context(|| format!("unknown site '{slug}'"))?;
        let minutes = self.minutes.unwrap_or(site.default_minutes);

        let text = manager::read_at(&hosts)
            .with_context(|| format!("failed to read {}", hosts.display()))?;
        let updated = manager::unblock_domains(&text, &site.domains);
        manager::write_at(&hosts, &updated, paths::target_owner().as_deref())
            .with_context(|| format!("failed to write {}", hosts.display()))?;

        let until = Utc::now() + Duration::minutes(minutes as i64);
        state::set_expiry_at(&home, &slug, until)
            .with_context(|| format!("failed to record grace window for '{slug}'"))?;

        let exe = std::env::current_exe().context("could not locate the hush binary")?;
        let mut worker = Command::new(exe);
        worker.args(["timer-worker", &slug.0, "--deadline", &until.to_rfc3339()]);

        match controller::start_at(&home, &slug, &mut worker) {
            Ok(pid) => {
                println!(
                    "{} {} for {} minutes (reblock timer pid {})",
                    "unblocked".green().bold(),
                    site.slug,
                    minutes,
                    pid
                );
            }
            Err(err) => {
                // The unblock is granted either way; only durability changes.
                eprintln!(
                    "{} reblock timer could not be armed: {err}",
                    "warning:".yellow().bold()
                );
                eprintln!(
                    "the daemon will re-apply the block on its first tick after {}",
                    until.to_rfc3339()
                );
            }
        }
        Ok(())
    }
}
