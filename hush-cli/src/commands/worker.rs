//! Hidden `timer-worker` subcommand — the body of the detached reblock
//! process spawned by `hush unblock`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use hush_core::{paths, SiteSlug};
use hush_timer::worker;

#[derive(Args, Debug)]
pub struct TimerWorkerArgs {
    /// Site slug to reblock at the deadline.
    pub site: String,

    /// RFC 3339 instant at which the block is re-applied.
    #[arg(long)]
    pub deadline: DateTime<Utc>,
}

impl TimerWorkerArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let hosts = paths::hosts_path();
        let slug = SiteSlug::from(self.site);

        worker::run(&home, &hosts, &slug, self.deadline)
            .with_context(|| format!("reblock timer for '{slug}' failed"))
    }
}
