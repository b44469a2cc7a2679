//! Hosts-file state manager — the read-modify-write boundary.
//!
//! Every operation acts on the *current* file contents, read fresh per call.
//! Nothing here caches a parsed representation between calls: other
//! processes (and the user) may edit the file at any time, and convergence
//! relies on each write being a full read-modify-write of the live text plus
//! idempotent transforms.
//!
//! ## Write protocol
//!
//! 1. Pipe the text through [`ensure_essential_entries`] — no write path can
//!    drop mandatory entries, regardless of caller intent.
//! 2. Write to `<path>.hush.tmp` (sibling — same filesystem, no EXDEV).
//! 3. Rename to the final path (atomic on POSIX).
//! 4. Best-effort ownership restore when running privileged on behalf of an
//!    unprivileged account; failures are logged and swallowed.

use std::path::Path;

use crate::error::{io_err, HostsError};
use crate::model::{self, HostEntry, BLOCK_IP, ESSENTIAL_ENTRIES};
use crate::ownership;

// ---------------------------------------------------------------------------
// Pure text transforms
// ---------------------------------------------------------------------------

/// Comment block prepended when the file has no leading header of its own.
const SYNTHESIZED_HEADER: &[&str] = &[
    "##",
    "# Host Database",
    "#",
    "# localhost is used to configure the loopback interface",
    "# when the system is booting.  Do not change this entry.",
    "##",
];

/// Insert any missing essential entries directly after the leading header
/// comment block, or prepend a synthesized header plus the entries when the
/// file has no header. Idempotent.
pub fn ensure_essential_entries(text: &str) -> String {
    let mut entries = model::parse(text);

    let missing: Vec<HostEntry> = ESSENTIAL_ENTRIES
        .iter()
        .filter(|(ip, host)| {
            !entries.iter().any(|e| {
                !e.is_comment_or_blank && e.ip == *ip && e.hostnames.iter().any(|h| h == host)
            })
        })
        .map(|(ip, host)| HostEntry::synthesized(ip, host))
        .collect();

    if missing.is_empty() {
        return text.to_owned();
    }

    let has_header = entries
        .first()
        .is_some_and(|e| e.raw_line.trim_start().starts_with('#'));

    let insert_at = if has_header {
        // End of the leading run of comment/blank lines.
        entries
            .iter()
            .position(|e| !e.is_comment_or_blank)
            .unwrap_or(entries.len())
    } else {
        let header: Vec<HostEntry> = SYNTHESIZED_HEADER
            .iter()
            .map(|line| HostEntry::comment(line))
            .collect();
        entries.splice(0..0, header);
        SYNTHESIZED_HEADER.len()
    };

    entries.splice(insert_at..insert_at, missing);
    model::render(&entries)
}

/// True iff any non-comment line maps `domain` to the loopback address.
pub fn is_domain_blocked(text: &str, domain: &str) -> bool {
    model::parse(text).iter().any(|e| model::is_blocking(e, domain))
}

/// Append a `127.0.0.1<TAB>domain` line for each domain not already blocked.
///
/// Appended lines follow the input order; pre-existing lines are untouched,
/// and a domain already blocked (including earlier in the same call) is never
/// duplicated.
pub fn block_domains(text: &str, domains: &[String]) -> String {
    let mut entries = model::parse(text);
    let mut changed = false;

    // Newline-terminated input parses to a trailing blank sentinel; drop it
    // so appended lines follow the existing content directly instead of
    // leaving a blank line behind on every mutating call.
    if entries
        .last()
        .is_some_and(|e| e.is_comment_or_blank && e.raw_line.is_empty())
    {
        entries.pop();
    }

    for domain in domains {
        let already = entries.iter().any(|e| model::is_blocking(e, domain));
        if !already {
            entries.push(HostEntry::synthesized(BLOCK_IP, domain));
            changed = true;
        }
    }

    if !changed {
        return text.to_owned();
    }
    model::render(&entries)
}

/// Remove every non-essential line containing at least one requested domain
/// as a hostname token.
///
/// A line mixing an essential hostname with a requested domain is kept
/// verbatim — essential wins, the line is never partially edited. That can
/// leave such a domain blocked; real hosts files are not expected to produce
/// mixed lines, and the behavior is asserted by tests.
pub fn unblock_domains(text: &str, domains: &[String]) -> String {
    let entries = model::parse(text);
    let kept: Vec<HostEntry> = entries
        .into_iter()
        .filter(|e| {
            if e.is_comment_or_blank || model::is_essential(e) {
                return true;
            }
            !e.hostnames.iter().any(|h| domains.iter().any(|d| d == h))
        })
        .collect();
    model::render(&kept)
}

// ---------------------------------------------------------------------------
// I/O boundary
// ---------------------------------------------------------------------------

/// Read the current hosts text. Errors are fatal to the operation.
pub fn read_at(path: &Path) -> Result<String, HostsError> {
    std::fs::read_to_string(path).map_err(|e| io_err(path, e))
}

/// Persist `text` to `path` via the write protocol described at module level.
///
/// `owner` names the unprivileged account to hand the file (and its parent
/// directory) back to after a privileged write; `None` skips the restore.
pub fn write_at(path: &Path, text: &str, owner: Option<&str>) -> Result<(), HostsError> {
    let ensured = ensure_essential_entries(text);

    let tmp = path.with_file_name(format!(
        "{}.hush.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "hosts".to_owned())
    ));

    std::fs::write(&tmp, ensured).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    if let Some(user) = owner {
        ownership::restore(path, user);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
