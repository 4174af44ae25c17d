//! Parsing of delimiter-joined lists handed over by the build system.

use crate::group::TestGroup;

/// Splits a delimiter-joined list of target names.
///
/// Surrounding whitespace (including the trailing newline of a list file) is
/// trimmed from every entry, and empty entries are dropped.
pub fn split_list(text: &str, separator: &str) -> Vec<String> {
    text.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits the list of per-binary test groups.
///
/// The list is produced by appending `<separator><group>` for every binary,
/// so it starts with an empty entry which is discarded. Other empty entries
/// are kept: they stand for binaries without tests and preserve the
/// positional alignment with the binary list.
pub fn split_groups(text: &str, separator: &str) -> Vec<TestGroup> {
    let text = text.trim_end_matches(['\r', '\n']);
    if text.is_empty() {
        return Vec::new();
    }
    let mut entries = text.split(separator).peekable();
    if entries.peek().is_some_and(|first| first.trim().is_empty()) {
        entries.next();
    }
    entries.map(|e| TestGroup::new(e.trim())).collect()
}
