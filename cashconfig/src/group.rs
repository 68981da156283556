//! Keyed collection of nodes, the interior of the config tree.

use std::collections::{BTreeMap, btree_map::Entry};

use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    node::{Node, NodeKind, json_shape},
    path::child_path,
    report::{Issue, Reporter},
};

/// A group of uniquely keyed child nodes. Serializes to a JSON object.
///
/// Children are kept sorted by key so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupNode {
    children: BTreeMap<String, Node>,
}

impl GroupNode {
    /// Empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group from initial nodes.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`] if two nodes share a key.
    pub fn with_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self> {
        let mut group = Self::new();
        for node in nodes {
            let key = node.key().to_string();
            if !group.add(node) {
                return Err(Error::DuplicateKey(key));
            }
        }
        Ok(group)
    }

    /// Insert `node` unless its key is taken. Returns whether it was inserted.
    pub fn add(&mut self, node: Node) -> bool {
        match self.children.entry(node.key().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(node);
                true
            }
        }
    }

    /// Insert `node`, returning whatever was stored under its key before.
    pub fn set(&mut self, node: Node) -> Option<Node> {
        self.children.insert(node.key().to_string(), node)
    }

    /// Child stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children.get(key)
    }

    /// Mutable [`GroupNode::get`].
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.children.get_mut(key)
    }

    /// Detach and return the child stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.children.remove(key)
    }

    /// Whether a child is stored under `key`.
    pub fn has(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    /// Number of children.
    pub fn size(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Children in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    /// Owned snapshot of the children. Changing it does not touch the group.
    pub fn get_value(&self) -> Vec<Node> {
        self.children.values().cloned().collect()
    }

    /// Replace all children. Later nodes win over earlier ones with the same key.
    pub fn set_value(&mut self, nodes: impl IntoIterator<Item = Node>) {
        self.children.clear();
        for node in nodes {
            self.set(node);
        }
    }

    /// Serialize the children into a JSON object.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for child in self.children.values() {
            child.append_to_object(&mut object);
        }
        Value::Object(object)
    }

    /// Merge a JSON object into the group.
    ///
    /// Existing children are updated in place and keep their kind. Unknown
    /// keys become new children of the inferred kind. Entries whose shape
    /// disagrees with the existing child, or whose kind cannot be inferred,
    /// are skipped and passed to `reporter`.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if `value` is not an object.
    pub fn from_json(&mut self, value: &Value, reporter: &dyn Reporter) -> Result<()> {
        match value {
            Value::Object(entries) => self.decode(entries, "", reporter),
            other => Err(Error::type_mismatch("", NodeKind::Group, json_shape(other))),
        }
    }

    pub(crate) fn decode(
        &mut self,
        entries: &Map<String, Value>,
        at: &str,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        for (key, value) in entries {
            let path = child_path(at, key);
            match self.children.entry(key.clone()) {
                Entry::Occupied(mut slot) => {
                    let child = slot.get_mut();
                    if NodeKind::infer(value) != Some(child.kind()) {
                        reporter.report(&Issue::TypeMismatch {
                            path,
                            expected: child.kind(),
                            found: json_shape(value).to_string(),
                        });
                        continue;
                    }
                    child.decode(value, &path, reporter)?;
                }
                Entry::Vacant(slot) => {
                    let decoded = Node::decoded(key.as_str(), value, &path, reporter)?;
                    match decoded {
                        Some(node) => {
                            slot.insert(node);
                        }
                        None => reporter.report(&Issue::NoInferredKind {
                            path,
                            value: value.to_string(),
                        }),
                    }
                }
            }
        }
        Ok(())
    }
}
