//! Canonical form of a filter list
//!
//! Publishers often regenerate a list only to bump a timestamp in a header
//! comment, or reorder otherwise identical rules. Two lists are considered the
//! same when their canonical forms are equal:
//!
//! 1. a leading `[...]` format line (e.g. `[Adblock Plus 2.0]`) is dropped
//! 2. `!` comment lines and empty lines are dropped
//! 3. the remaining rules are sorted
//!
//! Lines end at `\n`; a trailing `\r` on any line, including the last one, is
//! not part of the line.
//!
//! Only the very first line is ever treated as a header. A header preceded by
//! blank lines is kept and simply sorted with the rules.

/// Comment marker in adblock-style filter lists
const COMMENT_PREFIX: char = '!';

/// Compute the canonical form of a filter list.
///
/// Total: any input, including an empty one, yields a string.
pub fn canonicalize(text: &str) -> String {
    let mut lines = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line));

    let first = match lines.next() {
        Some(line) if is_header(line) => None,
        Some(line) => Some(line),
        None => return String::new(),
    };

    let mut rules: Vec<&str> = first
        .into_iter()
        .chain(lines)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .collect();

    rules.sort_unstable();
    rules.join("\n")
}

fn is_header(line: &str) -> bool {
    line.starts_with('[') && line.ends_with(']')
}
