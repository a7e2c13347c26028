//! Log sanitizing helpers. Display names come from config files and the
//! world engine and may contain formatting markup or control characters;
//! log lines must stay single-line.

/// Render a user-supplied string safe for single-line log output.
/// Control characters become spaces and long strings are truncated.
pub fn clean_log(s: &str) -> String {
    const MAX: usize = 96;
    let mut out = String::with_capacity(s.len().min(MAX));
    for ch in s.chars().take(MAX) {
        if ch.is_control() {
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
    if s.chars().count() > MAX {
        out.push('…');
    }
    out
}
