//! End-to-end CLI flows against a temp home and a temp hosts file.

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

use hush_core::{state, SiteSlug};
use hush_hosts::manager;
use hush_timer::paths::marker_path;

fn hush_cmd(home: &Path, hosts: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hush"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("HUSH_HOSTS_PATH", hosts)
        .env_remove("HUSH_OWNER")
        .env_remove("SUDO_USER");
    cmd
}

/// Temp home plus a hosts file seeded with header + essentials.
fn setup() -> (TempDir, std::path::PathBuf) {
    let home = TempDir::new().expect("home");
    let hosts = home.path().join("hosts");
    manager::write_at(&hosts, "", None).expect("seed hosts file");
    (home, hosts)
}

fn hosts_text(hosts: &Path) -> String {
    std::fs::read_to_string(hosts).expect("read hosts")
}

#[test]
fn block_adds_every_site_domain() {
    let (home, hosts) = setup();

    hush_cmd(home.path(), &hosts)
        .args(["block", "reddit"])
        .assert()
        .success()
        .stdout(contains("blocked reddit"));

    let text = hosts_text(&hosts);
    for domain in ["reddit.com", "www.reddit.com", "old.reddit.com"] {
        assert!(manager::is_domain_blocked(&text, domain), "{domain} not blocked");
    }
    assert!(text.contains("127.0.0.1\tlocalhost"), "essentials intact");
}

#[test]
fn unblock_grants_window_and_arms_timer() {
    let (home, hosts) = setup();
    let slug = SiteSlug::from("reddit");

    hush_cmd(home.path(), &hosts)
        .args(["block", "reddit"])
        .assert()
        .success();

    hush_cmd(home.path(), &hosts)
        .args(["unblock", "reddit", "--minutes", "5"])
        .assert()
        .success()
        .stdout(contains("unblocked reddit for 5 minutes"));

    let text = hosts_text(&hosts);
    assert!(!manager::is_domain_blocked(&text, "reddit.com"));
    assert!(text.contains("127.0.0.1\tlocalhost"), "essentials survive unblock");

    let record = state::get_at(home.path(), &slug)
        .expect("state read")
        .expect("grace window recorded");
    assert!(record.unblocked_until.is_some());
    assert!(marker_path(home.path(), &slug).exists(), "timer marker written");

    // Re-blocking cancels the timer and closes the window.
    hush_cmd(home.path(), &hosts)
        .args(["block", "reddit"])
        .assert()
        .success()
        .stdout(contains("cancelled pending reblock timer"));

    let text = hosts_text(&hosts);
    assert!(manager::is_domain_blocked(&text, "reddit.com"));
    let record = state::get_at(home.path(), &slug)
        .expect("state read")
        .expect("record persists");
    assert!(record.unblocked_until.is_none());
    assert!(!marker_path(home.path(), &slug).exists(), "marker removed");
}

#[test]
fn daemon_tick_recovers_a_lost_timer() {
    let (home, hosts) = setup();
    let slug = SiteSlug::from("youtube");

    // Simulate a crash: expiry in the past, no timer process, domains open.
    let past = chrono::Utc::now() - chrono::Duration::minutes(30);
    state::set_expiry_at(home.path(), &slug, past).expect("set expiry");

    hush_cmd(home.path(), &hosts)
        .args(["daemon", "tick"])
        .assert()
        .success()
        .stdout(contains("reblocked youtube"));

    let text = hosts_text(&hosts);
    assert!(manager::is_domain_blocked(&text, "youtube.com"));
    let record = state::get_at(home.path(), &slug)
        .expect("state read")
        .expect("record persists for audit");
    assert!(record.unblocked_until.is_none());
}

#[test]
fn status_json_reports_block_state() {
    let (home, hosts) = setup();

    hush_cmd(home.path(), &hosts)
        .args(["block", "hackernews"])
        .assert()
        .success();

    let output = hush_cmd(home.path(), &hosts)
        .args(["status", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    let sites = report.as_array().expect("array of sites");
    let hn = sites
        .iter()
        .find(|s| s["site"] == "hackernews")
        .expect("hackernews in report");
    assert_eq!(hn["state"], "blocked");
    assert_eq!(hn["timer_running"], false);

    let reddit = sites
        .iter()
        .find(|s| s["site"] == "reddit")
        .expect("reddit in report");
    assert_eq!(reddit["state"], "open");
}

#[test]
fn unknown_site_is_a_single_fatal_error() {
    let (home, hosts) = setup();

    hush_cmd(home.path(), &hosts)
        .args(["block", "definitely-not-a-site"])
        .assert()
        .failure()
        .stderr(contains("definitely-not-a-site"));
}

#[test]
fn site_add_then_block_uses_custom_domains() {
    let (home, hosts) = setup();

    hush_cmd(home.path(), &hosts)
        .args([
            "site",
            "add",
            "chess",
            "--type",
            "other",
            "--minutes",
            "20",
            "chess.com",
            "www.chess.com",
        ])
        .assert()
        .success()
        .stdout(contains("saved site 'chess'"));

    hush_cmd(home.path(), &hosts)
        .args(["site", "list"])
        .assert()
        .success()
        .stdout(contains("chess.com"));

    hush_cmd(home.path(), &hosts)
        .args(["block", "chess"])
        .assert()
        .success();
    assert!(manager::is_domain_blocked(&hosts_text(&hosts), "www.chess.com"));
}
