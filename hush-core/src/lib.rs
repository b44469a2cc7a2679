//! Hush core library — domain types, site catalog, persisted site state.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`error`] — [`StoreError`]
//! - [`sites`] — seeded site catalog (load / save / find)
//! - [`state`] — per-site expiry records owned by the timer subsystem
//! - [`paths`] — `~/.hush` layout and environment-driven overrides

pub mod error;
pub mod paths;
pub mod sites;
pub mod state;
pub mod types;

pub use error::StoreError;
pub use types::{Site, SiteSlug, SiteState, SiteType};
