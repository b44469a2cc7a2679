//! Stateless reconciliation pass over persisted site state.
//!
//! For every site with a non-null `unblocked_until`:
//! - expiry in the past ⇒ re-apply the block and clear the expiry (the record
//!   persists with a null window for audit);
//! - expiry in the future ⇒ leave it alone, the grace window is still open.
//!
//! The reconciler only ever *adds* blocks back. It cannot be used to remove
//! entries, so it can neither defeat the essential-entries invariant nor
//! silently keep a site open. One site failing (e.g. a state record whose
//! slug has been removed from the catalog) is logged and skipped; it never
//! aborts the rest of the scan.

use std::path::Path;

use chrono::{DateTime, Utc};

use hush_core::{state, SiteSlug, StoreError};

use crate::controller;
use crate::error::TimerError;
use crate::reblock;

/// What one tick did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// Sites whose expired grace window was closed this tick.
    pub reblocked: Vec<SiteSlug>,
    /// Sites still inside an open grace window.
    pub pending: usize,
    /// Expired sites that could not be re-blocked (error logged).
    pub failed: usize,
}

/// Run one reconciliation pass at `now`.
pub fn tick_at(home: &Path, hosts_path: &Path, now: DateTime<Utc>) -> Result<TickOutcome, TimerError> {
    let mut outcome = TickOutcome::default();

    for record in state::list_at(home)? {
        let Some(until) = record.unblocked_until else {
            continue;
        };
        if now < until {
            outcome.pending += 1;
            continue;
        }

        let slug = record.site_id.clone();
        match reblock::reblock_site_at(home, hosts_path, &slug) {
            Ok(_) => {
                // The ephemeral timer for this site evidently never fired;
                // drop its marker (and the process, if one is lingering) so a
                // future unblock starts clean.
                if let Err(err) = controller::kill_at(home, &slug) {
                    tracing::warn!(slug = %slug, error = %err, "stale timer cleanup failed");
                }
                outcome.reblocked.push(slug);
            }
            Err(TimerError::Store(StoreError::SiteNotFound { .. })) => {
                // Never guess domains: leave the record for the operator.
                tracing::warn!(slug = %slug, "expired state references a site missing from the catalog");
                outcome.failed += 1;
            }
            Err(err) => {
                tracing::error!(slug = %slug, error = %err, "reblock failed; will retry next tick");
                outcome.failed += 1;
            }
        }
    }

    Ok(outcome)
}
