//! Dotted path parsing.
//!
//! A path like `server.tls.port` names the node `port` inside group `tls`
//! inside group `server` at the root. Keys cannot contain `.`; there is no
//! escaping.

use crate::error::{Error, Result};

/// Split `path` into its segments.
///
/// # Errors
///
/// [`Error::NotFound`] for an empty path or an empty segment (`a..b`, `.a`).
pub fn segments(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Err(Error::not_found(path, ""));
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::not_found(path, ""));
    }
    Ok(segments)
}

/// Split `path` into the path of its parent and its last key.
///
/// `"a.b.c"` gives `(Some("a.b"), "c")`, `"a"` gives `(None, "a")`.
pub fn split_last(path: &str) -> Result<(Option<&str>, &str)> {
    segments(path)?;
    Ok(match path.rsplit_once('.') {
        Some((parent, key)) => (Some(parent), key),
        None => (None, path),
    })
}

pub(crate) fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}
