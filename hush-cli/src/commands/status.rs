//! `hush status` — per-site blocking state, grace windows, and timers.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use hush_core::{paths, sites, state, Site};
use hush_hosts::manager;
use hush_timer::controller;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

/// Blocking state of one site, derived from fresh hosts text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum BlockState {
    /// Every catalog domain is blocked.
    Blocked,
    /// No catalog domain is blocked.
    Open,
    /// Some but not all domains are blocked (out-of-band edits).
    Partial,
}

#[derive(Debug, Serialize)]
struct SiteStatus {
    site: String,
    site_type: String,
    state: BlockState,
    unblocked_until: Option<DateTime<Utc>>,
    timer_pid: Option<u32>,
    timer_running: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let hosts = paths::hosts_path();

        let catalog = sites::load_at(&home).context("failed to load site catalog")?;
        let text = manager::read_at(&hosts)
            .with_context(|| format!("failed to read {}", hosts.display()))?;

        let mut report = Vec::new();
        for site in &catalog.sites {
            report.push(site_status(&home, &text, site)?);
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }
        print_table(&report);
        Ok(())
    }
}

fn site_status(
    home: &std::path::Path,
    hosts_text: &str,
    site: &Site,
) -> Result<SiteStatus> {
    let blocked = site
        .domains
        .iter()
        .filter(|d| manager::is_domain_blocked(hosts_text, d))
        .count();
    let block_state = if blocked == site.domains.len() {
        BlockState::Blocked
    } else if blocked == 0 {
        BlockState::Open
    } else {
        BlockState::Partial
    };

    let record = state::get_at(home, &site.slug)?;
    let timer = controller::status_at(home, &site.slug)?;

    Ok(SiteStatus {
        site: site.slug.0.clone(),
        site_type: site.site_type.to_string(),
        state: block_state,
        unblocked_until: record.and_then(|r| r.unblocked_until),
        timer_pid: timer.pid,
        timer_running: timer.running,
    })
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "SITE")]
    site: String,
    #[tabled(rename = "TYPE")]
    site_type: String,
    #[tabled(rename = "STATE")]
    state: String,
    #[tabled(rename = "UNBLOCKED UNTIL")]
    until: String,
    #[tabled(rename = "TIMER")]
    timer: String,
}

fn print_table(report: &[SiteStatus]) {
    let now = Utc::now();
    let rows: Vec<StatusRow> = report
        .iter()
        .map(|s| StatusRow {
            site: s.site.clone(),
            site_type: s.site_type.clone(),
            state: match s.state {
                BlockState::Blocked => "blocked".red().bold().to_string(),
                BlockState::Open => "open".green().bold().to_string(),
                BlockState::Partial => "partial".yellow().bold().to_string(),
            },
            until: match s.unblocked_until {
                Some(until) if until > now => {
                    let mins = (until - now).num_minutes();
                    format!("{} ({mins}m left)", until.format("%H:%M:%S"))
                }
                Some(until) => format!("{} (expired)", until.format("%H:%M:%S")),
                None => "-".to_string(),
            },
            timer: match (s.timer_pid, s.timer_running) {
                (Some(pid), true) => format!("pid {pid}"),
                (Some(pid), false) => format!("pid {pid} (dead)"),
                (None, _) => "-".to_string(),
            },
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
}
