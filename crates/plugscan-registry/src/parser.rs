//! entry_points.txt parser
//!
//! Reads the INI-style entry point file found in `.dist-info` directories back
//! into an [`EntryPointDict`].

use crate::entry_point::EntryPointDict;
use tracing::debug;

/// Parse every section of entry_points.txt content
///
/// Lines outside a section, comments and lines without `=` are ignored.
/// Whitespace around the name and value is dropped, so `name = mod:attr`
/// becomes `name=mod:attr`.
pub fn parse_entry_points_txt(content: &str) -> EntryPointDict {
    let mut result = EntryPointDict::new();
    let mut current_section: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            current_section = Some(line[1..line.len() - 1].trim().to_string());
            continue;
        }

        let Some(ref section) = current_section else {
            continue;
        };

        if let Some(entry) = parse_entry_point_line(line) {
            result.entry(section.clone()).or_default().push(entry);
        }
    }

    debug!(
        "Parsed {} entry point group(s) from entry_points.txt",
        result.len()
    );
    result
}

/// Normalize a single `name = value` line into `name=value`
pub fn parse_entry_point_line(line: &str) -> Option<String> {
    let (name, value) = line.split_once('=')?;
    let name = name.trim();
    let value = value.trim().trim_matches('"').trim_matches('\'');

    if name.is_empty() || value.is_empty() {
        return None;
    }

    Some(format!("{}={}", name, value))
}
