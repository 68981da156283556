//! Error types for config tree and store operations.

use std::{fmt, path::PathBuf};

use thiserror::Error;

use crate::node::NodeKind;

/// Errors produced by the node model, path resolution and file access.
#[derive(Debug, Error)]
pub enum Error {
    /// A path segment or key does not exist.
    #[error("item `{segment}` in path `{path}` was not found")]
    NotFound {
        /// Full dotted path that was requested.
        path: String,
        /// Segment where resolution stopped.
        segment: String,
    },

    /// A JSON shape or a declared kind conflicts with the expected kind.
    #[error("type mismatch at `{path}`: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Dotted path of the offending node or element.
        path: String,
        /// Kind the node requires.
        expected: String,
        /// Kind or JSON shape that was found instead.
        actual: String,
    },

    /// A node was narrowed to a variant it is not.
    #[error("wrong variant: expected {expected}, node is {actual}")]
    WrongVariant {
        /// Variant the caller asked for.
        expected: NodeKind,
        /// Variant the node holds.
        actual: NodeKind,
    },

    /// Two nodes with the same key were given to a group constructor.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// List index access outside `0..len`.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of elements in the list.
        len: usize,
    },

    /// Opening, reading or writing the backing file failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// Backing file path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file does not hold a well-formed document.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// Backing file path.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The tree could not be rendered in the backing format.
    #[error("failed to encode config: {0}")]
    Encode(String),

    /// Conversion between the tree and a typed serde value failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn not_found(path: &str, segment: &str) -> Self {
        Error::NotFound {
            path: path.to_string(),
            segment: segment.to_string(),
        }
    }

    pub(crate) fn type_mismatch(
        path: &str,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Error::TypeMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub(crate) fn encode(err: impl fmt::Display) -> Self {
        Error::Encode(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = Error::not_found("a.b.c", "b");
        assert_eq!(err.to_string(), "item `b` in path `a.b.c` was not found");

        let err = Error::type_mismatch("count", NodeKind::Boolean, NodeKind::Number);
        assert_eq!(
            err.to_string(),
            "type mismatch at `count`: expected boolean, found number"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = Error::Io {
            path: PathBuf::from("config.json"),
            source: std::io::Error::other("disk on fire"),
        };
        assert!(err.to_string().starts_with("failed to access"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
