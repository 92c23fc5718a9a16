//! Local filenames for downloaded cause lists.
//!
//! Names are a pure function of the selection criteria and the remote URL, so
//! re-running the same selection overwrites the earlier files in place.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::SelectionCriteria;

/// Runs of characters outside the allow-list (ASCII alphanumerics, `_`, `-`, `.`, space).
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-. ]+").unwrap());

/// Replace every run of disallowed characters with a single `_` and trim
/// surrounding whitespace.
pub fn safe_filename(name: &str) -> String {
    DISALLOWED.replace_all(name, "_").trim().to_string()
}

/// Last path segment of a URL string, query string included.
///
/// This is plain text splitting rather than URL parsing, so malformed links
/// still produce a name.
pub fn remote_basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Local filename for a document harvested with the given criteria.
pub fn output_filename(criteria: &SelectionCriteria, url: &str) -> String {
    safe_filename(&format!(
        "{}_{}_{}_{}_{}_{}",
        criteria.state,
        criteria.district,
        criteria.court_complex,
        criteria.court_or_all(),
        criteria.date,
        remote_basename(url)
    ))
}
