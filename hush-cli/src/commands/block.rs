//! `hush block` — close a site's grace window immediately.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use hush_core::{paths, SiteSlug};
use hush_timer::{controller, reblock};

#[derive(Args, Debug)]
pub struct BlockArgs {
    /// Site slug from the catalog (see `hush site list`).
    pub site: String,
}

impl BlockArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let hosts = paths::hosts_path();
        let slug = SiteSlug::from(self.site);

        // Cancel a pending reblock timer before applying the block by hand,
        // so the site is left with no in-flight timer at all.
        let outcome = controller::kill_at(&home, &slug)
            .with_context(|| format!("failed to stop timer for '{slug}'"))?;

        let site = reblock::reblock_site_at(&home, &hosts, &slug)
            .with_context(|| format!("failed to block '{slug}'"))?;

        println!(
            "{} {} ({} domains)",
            "blocked".red().bold(),
            site.slug,
            site.domains.len()
        );
        if outcome.killed {
            if let Some(pid) = outcome.pid {
                println!("cancelled pending reblock timer (pid {pid})");
            }
        }
        Ok(())
    }
}
