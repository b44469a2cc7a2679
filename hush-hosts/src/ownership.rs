//! Best-effort ownership restore after privileged writes.
//!
//! When hush runs under sudo the rename in the write protocol leaves the
//! hosts file owned by root. Handing the file (and its containing directory)
//! back to the invoking account keeps non-privileged status invocations able
//! to read it. Every failure here is logged and swallowed — ownership
//! restore never blocks the primary operation.

use std::path::Path;

use nix::unistd::{chown, User};

/// Restore ownership of `path` and its parent directory to `user`.
pub fn restore(path: &Path, user: &str) {
    let resolved = match User::from_name(user) {
        Ok(Some(u)) => u,
        Ok(None) => {
            tracing::warn!(user, "ownership restore skipped: unknown user");
            return;
        }
        Err(err) => {
            tracing::warn!(user, error = %err, "ownership restore skipped: user lookup failed");
            return;
        }
    };

    for target in [Some(path), path.parent()].into_iter().flatten() {
        if let Err(err) = chown(target, Some(resolved.uid), Some(resolved.gid)) {
            tracing::warn!(
                path = %target.display(),
                user,
                error = %err,
                "ownership restore failed"
            );
        }
    }
}
