//! Seeded site catalog.
//!
//! # Storage layout
//!
//! ```text
//! ~/.hush/
//!   sites.yaml   (full catalog — mode 0600, seeded on first load)
//! ```
//!
//! The catalog is static reference data: which domains make up each site and
//! the default grace period per site. It is read by the CLI and the daemon
//! and edited only through `hush site add`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::paths::{self, catalog_path};
use crate::types::{Site, SiteSlug, SiteType};

/// Grace period used when a site has no `default_minutes` of its own.
pub const DEFAULT_UNBLOCK_MINUTES: u64 = 15;

/// On-disk catalog payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    pub version: u32,
    #[serde(default)]
    pub sites: Vec<Site>,
}

/// The catalog shipped on first use.
pub fn seeded_catalog() -> Catalog {
    let site = |slug: &str, site_type: SiteType, minutes: u64, domains: &[&str]| Site {
        slug: SiteSlug::from(slug),
        site_type,
        default_minutes: minutes,
        domains: domains.iter().map(|d| (*d).to_owned()).collect(),
    };

    Catalog {
        version: 1,
        sites: vec![
            site(
                "twitter",
                SiteType::Social,
                15,
                &["twitter.com", "www.twitter.com", "x.com", "www.x.com"],
            ),
            site(
                "youtube",
                SiteType::Video,
                30,
                &["youtube.com", "www.youtube.com", "m.youtube.com"],
            ),
            site(
                "reddit",
                SiteType::Forum,
                15,
                &["reddit.com", "www.reddit.com", "old.reddit.com"],
            ),
            site(
                "instagram",
                SiteType::Social,
                15,
                &["instagram.com", "www.instagram.com"],
            ),
            site(
                "facebook",
                SiteType::Social,
                15,
                &["facebook.com", "www.facebook.com", "m.facebook.com"],
            ),
            site("hackernews", SiteType::News, 10, &["news.ycombinator.com"]),
        ],
    }
}

/// Load the catalog, seeding `sites.yaml` with the defaults if absent.
pub fn load_at(home: &Path) -> Result<Catalog, StoreError> {
    let path = catalog_path(home);
    if !path.exists() {
        let catalog = seeded_catalog();
        save_at(home, &catalog)?;
        return Ok(catalog);
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Catalog, StoreError> {
    load_at(&paths::home()?)
}

/// Atomically save the catalog: serialize → `.yaml.tmp` sibling → rename.
pub fn save_at(home: &Path, catalog: &Catalog) -> Result<(), StoreError> {
    let path = catalog_path(home);
    let Some(dir) = path.parent() else {
        return Err(StoreError::Io(std::io::Error::other("invalid catalog path")));
    };
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        set_dir_permissions(dir)?;
    }

    let yaml = serde_yaml::to_string(catalog)?;
    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, yaml)?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}

/// Find a site by slug, seeding the catalog if needed.
pub fn find_site_at(home: &Path, slug: &SiteSlug) -> Result<Site, StoreError> {
    let catalog = load_at(home)?;
    catalog
        .sites
        .into_iter()
        .find(|s| s.slug == *slug)
        .ok_or_else(|| StoreError::SiteNotFound {
            slug: slug.0.clone(),
        })
}

/// Add or replace a site entry and save the catalog.
pub fn upsert_site_at(home: &Path, site: Site) -> Result<(), StoreError> {
    let mut catalog = load_at(home)?;
    catalog.sites.retain(|s| s.slug != site.slug);
    catalog.sites.push(site);
    catalog.sites.sort_by(|a, b| a.slug.0.cmp(&b.slug.0));
    save_at(home, &catalog)
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
    use tempfile::TempDir;

    #[test]
    fn first_load_seeds_default_catalog() {
        let home = TempDir::new().unwrap();
        let catalog = load_at(home.path()).unwrap();
        assert!(!catalog.sites.is_empty());
        assert!(catalog_path(home.path()).exists());
    }

    #[test]
    fn second_load_returns_same_catalog() {
        let home = TempDir::new().unwrap();
        let first = load_at(home.path()).unwrap();
        let second = load_at(home.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn find_site_by_slug() {
        let home = TempDir::new().unwrap();
        let site = find_site_at(home.path(), &SiteSlug::from("reddit")).unwrap();
        assert!(site.domains.contains(&"reddit.com".to_string()));
    }

    #[test]
    fn find_unknown_slug_errors() {
        let home = TempDir::new().unwrap();
        let err = find_site_at(home.path(), &SiteSlug::from("nope")).unwrap_err();
        assert!(matches!(err, StoreError::SiteNotFound { .. }));
    }

    #[test]
    fn upsert_replaces_existing_entry() {
        let home = TempDir::new().unwrap();
        load_at(home.path()).unwrap();

        let custom = Site {
            slug: SiteSlug::from("reddit"),
            site_type: SiteType::Forum,
            default_minutes: 5,
            domains: vec!["reddit.com".into()],
        };
        upsert_site_at(home.path(), custom.clone()).unwrap();

        let found = find_site_at(home.path(), &SiteSlug::from("reddit")).unwrap();
        assert_eq!(found, custom);

        let catalog = load_at(home.path()).unwrap();
        let reddit_count = catalog
            .sites
            .iter()
            .filter(|s| s.slug.0 == "reddit")
            .count();
        assert_eq!(reddit_count, 1);
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let home = TempDir::new().unwrap();
        load_at(home.path()).unwrap();
        let tmp = catalog_path(home.path()).with_extension("yaml.tmp");
        assert!(!tmp.exists(), "tmp file should be removed after rename");
    }
}
