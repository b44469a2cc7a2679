//! launchd integration: keep the reconciler daemon alive across logins and
//! reboots (macOS only). The durable-recovery guarantee assumes the daemon
//! is restarted by the OS; this module is that autostart hook.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{io_err, TimerError};
use crate::paths::{launch_agents_dir, launchd_plist_path, DAEMON_LABEL};

/// Installed binary location referenced from the plist.
const INSTALLED_BINARY: &str = "/usr/local/bin/hush";

/// Render the launchd agent plist for the reconciler daemon.
pub fn generate_plist(binary_path: &Path, log_dir: &Path) -> String {
    let stdout = log_dir.join(crate::paths::DAEMON_STDOUT_LOG).display().to_string();
    let stderr = log_dir.join(crate::paths::DAEMON_STDERR_LOG).display().to_string();
    let binary = binary_path.display().to_string();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>Label</key>
  <string>{label}</string>
  <key>ProgramArguments</key>
  <array>
    <string>{binary}</string>
    <string>daemon</string>
    <string>start</string>
  </array>
  <key>RunAtLoad</key>
  <true/>
  <key>KeepAlive</key>
  <true/>
  <key>StandardOutPath</key>
  <string>{stdout}</string>
  <key>StandardErrorPath</key>
  <string>{stderr}</string>
</dict>
</plist>
"#,
        label = DAEMON_LABEL,
        binary = binary,
        stdout = stdout,
        stderr = stderr
    )
}

/// Write the plist and bootstrap the agent for the current user.
pub fn install(home: &Path) -> Result<PathBuf, TimerError> {
    ensure_macos()?;

    let logs = hush_core::paths::logs_dir(home);
    for dir in [
        launch_agents_dir(home),
        logs.clone(),
        hush_core::paths::run_dir(home),
        hush_core::paths::state_dir(home),
    ] {
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        }
    }

    let plist = launchd_plist_path(home);
    fs::write(&plist, generate_plist(Path::new(INSTALLED_BINARY), &logs))
        .map_err(|e| io_err(&plist, e))?;

    let domain = launchctl_domain()?;
    let service = format!("{domain}/{DAEMON_LABEL}");

    // A previous registration may or may not exist; boot it out either way.
    let _ = run_launchctl(&["bootout", &service], true);
    run_launchctl(&["bootstrap", &domain, &plist.display().to_string()], false)?;
    run_launchctl(&["kickstart", "-k", &service], false)?;

    Ok(plist)
}

/// Boot out the agent and remove its plist.
pub fn uninstall(home: &Path) -> Result<(), TimerError> {
    ensure_macos()?;

    let plist = launchd_plist_path(home);
    if plist.exists() {
        let domain = launchctl_domain()?;
        let service = format!("{domain}/{DAEMON_LABEL}");
        let _ = run_launchctl(&["bootout", &service], true);
        fs::remove_file(&plist).map_err(|e| io_err(&plist, e))?;
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn ensure_macos() -> Result<(), TimerError> {
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn ensure_macos() -> Result<(), TimerError> {
    Err(TimerError::Launchd(
        "launchd management is only supported on macOS".to_string(),
    ))
}

fn run_launchctl(args: &[&str], ignore_failure: bool) -> Result<(), TimerError> {
    let output = Command::new("launchctl")
        .args(args)
        .output()
        .map_err(|e| io_err("launchctl", e))?;

    if output.status.success() || ignore_failure {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Err(TimerError::Launchd(format!(
        "launchctl {} failed (status {}): {} {}",
        args.first().unwrap_or(&""),
        output.status,
        stdout,
        stderr
    )))
}

fn launchctl_domain() -> Result<String, TimerError> {
    let output = Command::new("id")
        .arg("-u")
        .output()
        .map_err(|e| io_err("id -u", e))?;
    if !output.status.success() {
        return Err(TimerError::Launchd(format!(
            "failed to resolve current uid (status {})",
            output.status
        )));
    }

    let uid = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if uid.is_empty() {
        return Err(TimerError::Launchd("current uid from `id -u` was empty".to_string()));
    }
    Ok(format!("gui/{uid}"))
}
