//! Persisted per-site timer state.
//!
//! # Storage layout
//!
//! ```text
//! ~/.hush/
//!   state/
//!     <slug>.yaml   (one SiteState per site — mode 0600)
//! ```
//!
//! Owned exclusively by the timer subsystem. The daemon reads every record on
//! each tick; status reporting reads individual records. Clearing an expiry
//! sets `unblocked_until` back to `None` rather than deleting the file, so
//! the record persists for audit. Clearing an already-null expiry is a no-op,
//! which makes races between a completing ephemeral timer and a daemon tick
//! harmless.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::paths::{self, state_dir};
use crate::types::{SiteSlug, SiteState};

/// `<home>/.hush/state/<slug>.yaml` — pure, no I/O.
pub fn state_path_at(home: &Path, slug: &SiteSlug) -> PathBuf {
    state_dir(home).join(format!("{}.yaml", slug.0))
}

/// Load the state record for `slug`, or `None` if no record exists yet.
pub fn get_at(home: &Path, slug: &SiteSlug) -> Result<Option<SiteState>, StoreError> {
    let path = state_path_at(home, slug);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)?;
    let state = serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse {
        path,
        source: e,
    })?;
    Ok(Some(state))
}

/// `get_at` convenience wrapper.
pub fn get(slug: &SiteSlug) -> Result<Option<SiteState>, StoreError> {
    get_at(&paths::home()?, slug)
}

/// Record that `slug` is intentionally unblocked until `until`.
pub fn set_expiry_at(
    home: &Path,
    slug: &SiteSlug,
    until: DateTime<Utc>,
) -> Result<SiteState, StoreError> {
    let state = SiteState {
        site_id: slug.clone(),
        unblocked_until: Some(until),
        updated_at: Utc::now(),
    };
    save_at(home, &state)?;
    Ok(state)
}

/// Clear the expiry for `slug`: set `unblocked_until` to `None` in place.
///
/// Idempotent — clearing a null expiry (or a slug with no record at all)
/// succeeds without touching the filesystem beyond the initial read.
pub fn clear_expiry_at(home: &Path, slug: &SiteSlug) -> Result<(), StoreError> {
    let Some(mut state) = get_at(home, slug)? else {
        return Ok(());
    };
    if state.unblocked_until.is_none() {
        return Ok(());
    }
    state.unblocked_until = None;
    state.updated_at = Utc::now();
    save_at(home, &state)
}

/// All persisted state records, sorted by slug.
pub fn list_at(home: &Path) -> Result<Vec<SiteState>, StoreError> {
    let dir = state_dir(home);
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut entries: Vec<_> = std::fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".yaml"))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut states = Vec::new();
    for entry in entries {
        let contents = std::fs::read_to_string(entry.path())?;
        let state: SiteState = serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse {
            path: entry.path(),
            source: e,
        })?;
        states.push(state);
    }
    Ok(states)
}

/// Atomically save a state record: serialize → `.yaml.tmp` sibling → rename.
fn save_at(home: &Path, state: &SiteState) -> Result<(), StoreError> {
    let dir = state_dir(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }

    let path = state_path_at(home, &state.site_id);
    let tmp = path.with_extension("yaml.tmp");
    let yaml = serde_yaml::to_string(state)?;
    std::fs::write(&tmp, yaml)?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    #[test]
    fn get_missing_record_returns_none() {
        let home = TempDir::new().unwrap();
        let state = get_at(home.path(), &SiteSlug::from("reddit")).unwrap();
        assert!(state.is_none());
    }

    #[test]
    fn set_then_get_roundtrip() {
        let home = TempDir::new().unwrap();
        let slug = SiteSlug::from("reddit");
        let until = Utc::now() + Duration::minutes(15);

        set_expiry_at(home.path(), &slug, until).unwrap();
        let state = get_at(home.path(), &slug).unwrap().expect("record");
        assert_eq!(state.site_id, slug);
        assert_eq!(state.unblocked_until, Some(until));
    }

    #[test]
    fn clear_nulls_expiry_but_keeps_record() {
        let home = TempDir::new().unwrap();
        let slug = SiteSlug::from("youtube");
        set_expiry_at(home.path(), &slug, Utc::now()).unwrap();

        clear_expiry_at(home.path(), &slug).unwrap();
        let state = get_at(home.path(), &slug).unwrap().expect("record persists");
        assert!(state.unblocked_until.is_none());
        assert!(state_path_at(home.path(), &slug).exists());
    }

    #[test]
    fn clear_is_idempotent() {
        let home = TempDir::new().unwrap();
        let slug = SiteSlug::from("youtube");

        // No record at all.
        clear_expiry_at(home.path(), &slug).unwrap();

        set_expiry_at(home.path(), &slug, Utc::now()).unwrap();
        clear_expiry_at(home.path(), &slug).unwrap();
        let first = get_at(home.path(), &slug).unwrap().expect("record");

        // Already null — must not rewrite the file.
        clear_expiry_at(home.path(), &slug).unwrap();
        let second = get_at(home.path(), &slug).unwrap().expect("record");
        assert_eq!(first, second);
    }

    #[test]
    fn list_returns_all_records_sorted() {
        let home = TempDir::new().unwrap();
        let now = Utc::now();
        set_expiry_at(home.path(), &SiteSlug::from("youtube"), now).unwrap();
        set_expiry_at(home.path(), &SiteSlug::from("reddit"), now).unwrap();

        let states = list_at(home.path()).unwrap();
        let slugs: Vec<&str> = states.iter().map(|s| s.site_id.0.as_str()).collect();
        assert_eq!(slugs, vec!["reddit", "youtube"]);
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let home = TempDir::new().unwrap();
        let slug = SiteSlug::from("clean");
        set_expiry_at(home.path(), &slug, Utc::now()).unwrap();
        let tmp = state_path_at(home.path(), &slug).with_extension("yaml.tmp");
        assert!(!tmp.exists(), "tmp file should be removed after rename");
    }
}
