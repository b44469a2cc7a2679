//! Domain types for the hush site catalog and timer state.
//!
//! All types are serializable/deserializable via serde + serde_yaml.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed slug identifying a site in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteSlug(pub String);

impl fmt::Display for SiteSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SiteSlug {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SiteSlug {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The category of a catalog site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SiteType {
    #[default]
    Social,
    Video,
    News,
    Forum,
    Other,
}

impl fmt::Display for SiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteType::Social => write!(f, "social"),
            SiteType::Video => write!(f, "video"),
            SiteType::News => write!(f, "news"),
            SiteType::Forum => write!(f, "forum"),
            SiteType::Other => write!(f, "other"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A logical group of domains sharing one blocking/unblocking policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub slug: SiteSlug,
    pub site_type: SiteType,
    /// Grace period granted by `hush unblock` when `--minutes` is omitted.
    pub default_minutes: u64,
    /// Domains blocked/unblocked together, in catalog order.
    pub domains: Vec<String>,
}

/// Durable record of "this site is intentionally unblocked until time T."
///
/// `unblocked_until == None` means fully blocked with no pending timer.
/// The record is never deleted once created — clearing the expiry sets the
/// field back to `None` so the row persists for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteState {
    pub site_id: SiteSlug,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unblocked_until: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl SiteState {
    /// True when a grace window was granted and has already elapsed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.unblocked_until, Some(until) if now >= until)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
