//! The shared reblock entrypoint.
//!
//! "Re-apply the block for site X" — invoked by the ephemeral timer worker,
//! by the reconciler daemon, and by `hush block`. Idempotent end to end:
//! re-adding already-present blocking lines is a no-op and clearing an
//! already-null expiry is a no-op, so redundant calls from both tiers are
//! harmless.

use std::path::Path;

use hush_core::{paths, sites, state, Site, SiteSlug};
use hush_hosts::manager;

use crate::error::TimerError;

/// Re-add blocking lines for every domain of `slug` and clear its persisted
/// expiry. Returns the site so callers can report what was blocked.
pub fn reblock_site_at(
    home: &Path,
    hosts_path: &Path,
    slug: &SiteSlug,
) -> Result<Site, TimerError> {
    let site = sites::find_site_at(home, slug)?;

    let text = manager::read_at(hosts_path)?;
    let updated = manager::block_domains(&text, &site.domains);
    manager::write_at(hosts_path, &updated, paths::target_owner().as_deref())?;

    state::clear_expiry_at(home, slug)?;

    tracing::info!(slug = %slug, domains = site.domains.len(), "block re-applied");
    Ok(site)
}
