//! Timer subsystem: ephemeral per-site reblock processes plus the durable
//! reconciler daemon.
//!
//! Two tiers guarantee that a temporary unblock is reliably reversed:
//! - [`controller`] spawns one detached timer process per site (the common
//!   case) and tracks it through a pid marker file.
//! - [`reconciler`] re-asserts blocks from persisted expiry state on a fixed
//!   interval, covering timers lost to crashes, reboots, or `kill -9`.

mod error;
pub mod controller;
pub mod launchd;
pub mod log_rotation;
pub mod paths;
pub mod reblock;
pub mod reconciler;
mod runtime;
pub mod worker;

pub use error::TimerError;
pub use launchd::{generate_plist, install as install_launchd, uninstall as uninstall_launchd};
pub use runtime::start_blocking;
