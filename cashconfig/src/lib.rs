//! # cashconfig
//!
//! A typed, hierarchical configuration store backed by a JSON document.
//!
//! You declare the default shape of your configuration as a tree of typed
//! nodes, bind it to a file, and cashconfig keeps the two in sync: loading
//! merges what is on disk into the defaults, saving writes the tree back.
//!
//! ## Features
//!
//! - Five node kinds: boolean, number, string, list and group
//! - Dotted path access (`server.tls.port`) with typed lookups
//! - Tolerant loading: unknown keys are materialized by type inference,
//!   malformed entries are skipped and reported instead of failing the load
//! - Homogeneous lists and uniquely keyed groups enforced at runtime
//! - JSON or TOML backing files, picked from the file extension
//! - Conversion to and from `serde` types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cashconfig::{GroupNode, Node, NodeKind, Store};
//!
//! let server = GroupNode::with_nodes(vec![
//!     Node::string("host", "localhost"),
//!     Node::number("port", 8080),
//! ])
//! .unwrap();
//!
//! let mut store = Store::new(
//!     "config.json",
//!     vec![Node::group("server", server), Node::boolean("debug", false)],
//! )
//! .unwrap();
//!
//! // Creates config.json from the defaults on first run.
//! store.load().unwrap();
//!
//! let port = store.get_item_as("server.port", NodeKind::Number).unwrap();
//! println!("port = {:?}", port.map(|p| p.to_json()));
//!
//! store.get_item_mut("debug").unwrap().set_bool(true).unwrap();
//! store.save().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`node`] - Node kinds, payloads and the JSON codec
//! - [`group`] - Keyed child collections
//! - [`list`] - Homogeneous element collections
//! - [`store`] - File-backed store and path resolution
//! - [`path`] - Dotted path parsing
//! - [`format`] - JSON and TOML file encodings
//! - [`report`] - Reporting of recoverable conditions
//! - [`error`] - Error types

#[macro_use]
extern crate log;

/// Error types and result alias.
pub mod error;

/// Backing file encodings.
pub mod format;

/// Group nodes.
pub mod group;

/// List nodes.
pub mod list;

/// The node model and its JSON codec.
pub mod node;

/// Dotted path parsing.
pub mod path;

/// Recoverable condition reporting.
pub mod report;

/// File-backed config store.
pub mod store;

pub use error::{Error, Result};
pub use format::Format;
pub use group::GroupNode;
pub use list::ListNode;
pub use node::{Node, NodeKind, NodeValue};
pub use report::{Issue, LogReporter, MemoryReporter, Reporter};
pub use store::Store;

pub use serde_json::{Number, Value};
