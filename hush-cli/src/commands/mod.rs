pub mod block;
pub mod daemon;
pub mod site;
pub mod status;
pub mod unblock;
pub mod worker;

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Home directory shared by every command.
pub(crate) fn home() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}
