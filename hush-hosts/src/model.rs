//! Pure hosts-file text transform — no I/O.
//!
//! A hosts file is a sequence of lines. Each line is either a comment/blank
//! or `IP<whitespace>hostname[ hostname...]` with an optional trailing
//! `#`-comment. Parsing keeps the original line text so untouched lines
//! round-trip byte-for-byte, preserving user edits, comments and formatting.

/// The loopback address used for blocking lines.
pub const BLOCK_IP: &str = "127.0.0.1";

/// `(ip, hostname)` pairs that must always exist in the file. Required for
/// baseline OS networking; never removed, even on explicit request.
pub const ESSENTIAL_ENTRIES: &[(&str, &str)] = &[
    ("127.0.0.1", "localhost"),
    ("255.255.255.255", "broadcasthost"),
    ("::1", "localhost"),
];

/// One logical line of the hosts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub ip: String,
    pub hostnames: Vec<String>,
    /// Original line text; rendered verbatim for parsed lines.
    pub raw_line: String,
    pub is_comment_or_blank: bool,
}

impl HostEntry {
    /// Build an entry that never existed in the source text. Rendered as
    /// `ip<TAB>hostname`.
    pub fn synthesized(ip: &str, hostname: &str) -> Self {
        HostEntry {
            ip: ip.to_owned(),
            hostnames: vec![hostname.to_owned()],
            raw_line: format!("{ip}\t{hostname}"),
            is_comment_or_blank: false,
        }
    }

    /// Build a comment line (used when synthesizing a header block).
    pub fn comment(text: &str) -> Self {
        HostEntry {
            ip: String::new(),
            hostnames: vec![],
            raw_line: text.to_owned(),
            is_comment_or_blank: true,
        }
    }
}

/// Parse hosts text into ordered entries. CRLF input is tolerated; the `\r`
/// is stripped from `raw_line` so re-rendered files are always LF-only.
pub fn parse(text: &str) -> Vec<HostEntry> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> HostEntry {
    let tokens = tokens_ignoring_comment(line);
    match tokens.split_first() {
        Some((ip, hostnames)) => HostEntry {
            ip: (*ip).to_owned(),
            hostnames: hostnames.iter().map(|h| (*h).to_owned()).collect(),
            raw_line: line.to_owned(),
            is_comment_or_blank: false,
        },
        None => HostEntry {
            ip: String::new(),
            hostnames: vec![],
            raw_line: line.to_owned(),
            is_comment_or_blank: true,
        },
    }
}

/// Whitespace-separated tokens of `line`, with everything from the first
/// unescaped `#` onward stripped first. Comments never count as hostnames.
pub fn tokens_ignoring_comment(line: &str) -> Vec<&str> {
    let mut end = line.len();
    let bytes = line.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && (i == 0 || bytes[i - 1] != b'\\') {
            end = i;
            break;
        }
    }
    line[..end].split_whitespace().collect()
}

/// True iff `entry` maps `domain` to the loopback address.
pub fn is_blocking(entry: &HostEntry, domain: &str) -> bool {
    !entry.is_comment_or_blank
        && entry.ip == BLOCK_IP
        && entry.hostnames.iter().any(|h| h == domain)
}

/// True iff `(entry.ip, h)` matches an essential pair for some hostname `h`.
pub fn is_essential(entry: &HostEntry) -> bool {
    !entry.is_comment_or_blank
        && ESSENTIAL_ENTRIES.iter().any(|(ip, host)| {
            entry.ip == *ip && entry.hostnames.iter().any(|h| h == host)
        })
}

/// Render entries back to hosts text; guarantees a trailing newline.
pub fn render(entries: &[HostEntry]) -> String {
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        // parse() yields one trailing blank entry for text that already ended
        // in a newline; skip it so render(parse(x)) == x.
        if i + 1 == entries.len() && entry.raw_line.is_empty() && entry.is_comment_or_blank {
            break;
        }
        out.push_str(&entry.raw_line);
        out.push('\n');
    }
    if out.is_empty() {
        out.push('\n');
    }
    out
}
