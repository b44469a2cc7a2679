//! `~/.hush` layout and environment-driven configuration.
//!
//! Every stateful function in this workspace takes an explicit `home: &Path`
//! (`_at` form) so tests can point it at a `TempDir`; convenience wrappers
//! derive home from `dirs::home_dir()`.

use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Env var overriding the hosts file location (test environments).
pub const HOSTS_PATH_ENV: &str = "HUSH_HOSTS_PATH";

/// Env var naming the account that should own hush-written files when the
/// process runs with elevated privileges. Falls back to `SUDO_USER`.
pub const OWNER_ENV: &str = "HUSH_OWNER";

/// The OS host-name-mapping file mutated by the blocker.
pub const SYSTEM_HOSTS_PATH: &str = "/etc/hosts";

pub fn hush_root(home: &Path) -> PathBuf {
    home.join(".hush")
}

/// Per-site expiry records live here, one YAML file per site.
pub fn state_dir(home: &Path) -> PathBuf {
    hush_root(home).join("state")
}

/// Per-site timer pid markers live here.
pub fn run_dir(home: &Path) -> PathBuf {
    hush_root(home).join("run")
}

pub fn logs_dir(home: &Path) -> PathBuf {
    hush_root(home).join("logs")
}

pub fn catalog_path(home: &Path) -> PathBuf {
    hush_root(home).join("sites.yaml")
}

/// Resolve the hosts file path: `$HUSH_HOSTS_PATH` if set, else `/etc/hosts`.
pub fn hosts_path() -> PathBuf {
    match std::env::var(HOSTS_PATH_ENV) {
        Ok(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from(SYSTEM_HOSTS_PATH),
    }
}

/// Account to restore file ownership to after privileged writes, if any.
///
/// `$HUSH_OWNER` wins over `$SUDO_USER`; `root` is never a restore target.
pub fn target_owner() -> Option<String> {
    for var in [OWNER_ENV, "SUDO_USER"] {
        if let Ok(user) = std::env::var(var) {
            if !user.is_empty() && user != "root" {
                return Some(user);
            }
        }
    }
    None
}

/// `dirs::home_dir()` or [`StoreError::HomeNotFound`].
pub fn home() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_at_dot_hush() {
        let home = Path::new("/Users/tester");
        assert_eq!(state_dir(home), home.join(".hush").join("state"));
        assert_eq!(run_dir(home), home.join(".hush").join("run"));
        assert_eq!(logs_dir(home), home.join(".hush").join("logs"));
        assert_eq!(catalog_path(home), home.join(".hush").join("sites.yaml"));
    }
}
