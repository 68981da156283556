//! Reporting of recoverable conditions.
//!
//! Lookups that miss and malformed entries skipped while decoding are not
//! errors: they are handed to a [`Reporter`] and the operation carries on.
//! [`LogReporter`] forwards them to the `log` facade, [`MemoryReporter`]
//! keeps them around so callers can inspect what happened.

use std::{fmt, sync::Mutex};

use crate::node::NodeKind;

/// A recoverable condition observed while resolving paths or decoding JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// A path segment did not resolve to an existing node.
    PathNotFound { path: String, segment: String },
    /// A JSON value had a different shape than the node it was meant for.
    TypeMismatch {
        path: String,
        expected: NodeKind,
        found: String,
    },
    /// No node kind could be inferred for a JSON value (e.g. `null`).
    NoInferredKind { path: String, value: String },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::PathNotFound { path, segment } => {
                write!(f, "item `{segment}` in path `{path}` was not found")
            }
            Issue::TypeMismatch {
                path,
                expected,
                found,
            } => write!(f, "type mismatch at `{path}`: {found} is not {expected}"),
            Issue::NoInferredKind { path, value } => {
                write!(f, "no type for JSON key `{path}`: {value}")
            }
        }
    }
}

/// Sink for recoverable conditions.
pub trait Reporter: Send + Sync {
    /// Record one condition.
    fn report(&self, issue: &Issue);
}

/// Reports every issue as a single `error!` line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, issue: &Issue) {
        error!("{issue}");
    }
}

/// Collects issues in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    issues: Mutex<Vec<Issue>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far, oldest first.
    pub fn issues(&self) -> Vec<Issue> {
        match self.issues.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drain the recorded issues.
    pub fn take(&self) -> Vec<Issue> {
        match self.issues.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, issue: &Issue) {
        debug!("recorded: {issue}");
        match self.issues.lock() {
            Ok(mut guard) => guard.push(issue.clone()),
            Err(poisoned) => poisoned.into_inner().push(issue.clone()),
        }
    }
}
