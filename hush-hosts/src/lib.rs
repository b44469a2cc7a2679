//! Hosts-file model and state manager.
//!
//! Two layers, split the same way rendering and writing are split elsewhere
//! in this workspace:
//! - [`model`] — pure parsing/rendering of hosts text into structured
//!   entries; no I/O, byte-for-byte round-tripping of untouched lines.
//! - [`manager`] — read-modify-write boundary: fresh read per operation,
//!   essential-entry enforcement on every write, atomic tmp+rename, and
//!   best-effort ownership restore after privileged writes.

pub mod error;
pub mod manager;
pub mod model;
mod ownership;

pub use error::HostsError;
pub use model::{HostEntry, ESSENTIAL_ENTRIES};
