//! File-backed config store with dotted path access.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    format::Format,
    group::GroupNode,
    node::{Node, NodeKind, json_shape},
    path,
    report::{Issue, LogReporter, Reporter},
};

/// A root group bound to a backing file.
///
/// The defaults given at construction are the declared shape. [`Store::load`]
/// merges the file into them, [`Store::save`] writes the current tree back.
/// Nodes are addressed by dotted paths such as `server.port`.
///
/// The store has a single owner; wrap it in a lock if it must be shared.
#[derive(Clone)]
pub struct Store {
    root: GroupNode,
    path: PathBuf,
    format: Format,
    reporter: Arc<dyn Reporter>,
}

impl Store {
    /// Create a store whose root holds `defaults`.
    ///
    /// The backing format follows the file extension, see [`Format::from_path`].
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`] if two defaults share a key.
    pub fn new(path: impl AsRef<Path>, defaults: impl IntoIterator<Item = Node>) -> Result<Self> {
        let mut store = Self::empty(path);
        store.root = GroupNode::with_nodes(defaults)?;
        Ok(store)
    }

    /// Create a store with no declared defaults.
    pub fn empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            root: GroupNode::new(),
            format: Format::from_path(&path),
            path,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Create a store whose defaults are inferred from a serializable value.
    ///
    /// Fields serializing to `null` have no node kind; they are skipped and
    /// passed to `reporter`, which the store keeps afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if `defaults` does not serialize to an object.
    pub fn from_serialize<T: Serialize>(
        path: impl AsRef<Path>,
        defaults: &T,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self> {
        let value = serde_json::to_value(defaults)?;
        let mut store = Self::empty(path).with_reporter(reporter);
        store.root.from_json(&value, store.reporter.as_ref())?;
        Ok(store)
    }

    /// Route recoverable conditions to `reporter` instead of the log.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Override the backing format picked from the file extension.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Backing file encoding.
    pub fn format(&self) -> Format {
        self.format
    }

    /// The root group.
    pub fn root(&self) -> &GroupNode {
        &self.root
    }

    /// Snapshot of the top-level entries.
    pub fn items(&self) -> Vec<Node> {
        self.root.get_value()
    }

    /// The whole tree as one JSON object.
    pub fn to_json(&self) -> Value {
        self.root.to_json()
    }

    /// Convert the current tree into a typed value.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_json())?)
    }

    /// Whether the backing file exists.
    pub fn has_file(&self) -> bool {
        self.path.is_file()
    }

    /// Merge the backing file into the tree.
    ///
    /// A missing file is created from the current tree. An empty file keeps
    /// the current tree. Entries that do not fit the tree are skipped and
    /// reported; the rest of the file still loads.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, [`Error::Parse`] if it is not
    /// a document whose root is an object. The tree is untouched in both cases.
    pub fn load(&mut self) -> Result<()> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} not found, writing defaults", self.path.display());
                return self.save();
            }
            Err(source) => {
                return Err(Error::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let text = String::from_utf8(bytes).map_err(|e| Error::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        if text.trim().is_empty() {
            debug!("{} is empty, keeping defaults", self.path.display());
            return Ok(());
        }

        let value = self.format.parse(&text, &self.path)?;
        if !value.is_object() {
            return Err(Error::Parse {
                path: self.path.clone(),
                message: format!("document root is {}, expected object", json_shape(&value)),
            });
        }
        self.root.from_json(&value, self.reporter.as_ref())?;
        debug!("loaded {}", self.path.display());
        Ok(())
    }

    /// Write the tree to the backing file, replacing its contents.
    pub fn save(&self) -> Result<()> {
        let text = self.format.render(&self.root.to_json())?;
        fs::write(&self.path, text.as_bytes()).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("wrote {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }

    /// Walk every segment but the last, returning the group they lead to and
    /// the last segment.
    fn locate<'s, 'p>(&'s self, path: &'p str) -> Result<(&'s GroupNode, &'p str)> {
        let segments = path::segments(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::not_found(path, ""));
        };
        let mut current = &self.root;
        for segment in parents {
            current = current
                .get(segment)
                .and_then(|node| node.as_group().ok())
                .ok_or_else(|| Error::not_found(path, segment))?;
        }
        Ok((current, *last))
    }

    fn locate_mut<'s, 'p>(&'s mut self, path: &'p str) -> Result<(&'s mut GroupNode, &'p str)> {
        let segments = path::segments(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::not_found(path, ""));
        };
        let mut current = &mut self.root;
        for segment in parents {
            current = current
                .get_mut(segment)
                .and_then(|node| node.as_group_mut().ok())
                .ok_or_else(|| Error::not_found(path, segment))?;
        }
        Ok((current, *last))
    }

    fn lookup(&self, path: &str) -> Result<&Node> {
        let (parent, key) = self.locate(path)?;
        parent.get(key).ok_or_else(|| Error::not_found(path, key))
    }

    fn lookup_mut(&mut self, path: &str) -> Result<&mut Node> {
        let (parent, key) = self.locate_mut(path)?;
        let node = parent.get_mut(key);
        node.ok_or_else(|| Error::not_found(path, key))
    }

    fn detach(&mut self, path: &str) -> Result<Node> {
        let (parent, key) = self.locate_mut(path)?;
        let node = parent.remove(key);
        node.ok_or_else(|| Error::not_found(path, key))
    }

    /// The group that directly holds the last segment of `path`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if an intermediate segment is missing or is not a
    /// group, or if `path` is empty or has an empty segment.
    pub fn resolve_parent(&self, path: &str) -> Result<&GroupNode> {
        self.locate(path).map(|(parent, _)| parent)
    }

    /// Node at `path`, or `None` (reported) if there is none.
    pub fn get_item(&self, path: &str) -> Option<&Node> {
        found(self.reporter.as_ref(), self.lookup(path))
    }

    /// Node at `path`, checked to be of `kind`.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if the node exists with another kind.
    pub fn get_item_as(&self, path: &str, kind: NodeKind) -> Result<Option<&Node>> {
        let Some(node) = self.get_item(path) else {
            return Ok(None);
        };
        if node.kind() != kind {
            return Err(Error::type_mismatch(path, kind, node.kind()));
        }
        Ok(Some(node))
    }

    /// Mutable node at `path`, or `None` (reported) if there is none.
    pub fn get_item_mut(&mut self, path: &str) -> Option<&mut Node> {
        let reporter = Arc::clone(&self.reporter);
        found(reporter.as_ref(), self.lookup_mut(path))
    }

    /// Whether a node exists at `path`. Misses are not reported.
    pub fn has_item(&self, path: &str) -> bool {
        self.lookup(path).is_ok()
    }

    /// Kind of the node at `path`. Misses are not reported.
    pub fn get_type(&self, path: &str) -> Option<NodeKind> {
        self.lookup(path).ok().map(Node::kind)
    }

    /// Remove and return the node at `path`, or `None` (reported) if there is none.
    pub fn remove_item(&mut self, path: &str) -> Option<Node> {
        let reporter = Arc::clone(&self.reporter);
        found(reporter.as_ref(), self.detach(path))
    }

    /// Set `node` at the root, returning the node it replaced.
    pub fn set_item(&mut self, node: Node) -> Option<Node> {
        self.root.set(node)
    }

    /// Add `node` at the root unless its key is taken.
    pub fn add_item(&mut self, node: Node) -> bool {
        self.root.add(node)
    }

    /// Store `node` in the group or list at `path`.
    ///
    /// A group takes `node` under its key, replacing (and returning) any
    /// previous node. A list appends it.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if nothing is at `path`, [`Error::TypeMismatch`] if
    /// the target is a scalar or a list of another kind.
    pub fn set_item_at(&mut self, path: &str, node: Node) -> Result<Option<Node>> {
        let target = self.lookup_mut(path)?;
        match target.kind() {
            NodeKind::Group => Ok(target.as_group_mut()?.set(node)),
            NodeKind::List => {
                target.as_list_mut()?.add(node)?;
                Ok(None)
            }
            other => Err(Error::type_mismatch(path, "group or list", other)),
        }
    }

    /// Add `node` to the group or list at `path`.
    ///
    /// Returns `false` if a group already holds the key.
    ///
    /// # Errors
    ///
    /// Same as [`Store::set_item_at`].
    pub fn add_item_at(&mut self, path: &str, node: Node) -> Result<bool> {
        let target = self.lookup_mut(path)?;
        match target.kind() {
            NodeKind::Group => Ok(target.as_group_mut()?.add(node)),
            NodeKind::List => {
                target.as_list_mut()?.add(node)?;
                Ok(true)
            }
            other => Err(Error::type_mismatch(path, "group or list", other)),
        }
    }
}

fn found<T>(reporter: &dyn Reporter, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(Error::NotFound { path, segment }) => {
            reporter.report(&Issue::PathNotFound { path, segment });
            None
        }
        Err(err) => {
            warn!("{err}");
            None
        }
    }
}
