//! Homogeneous ordered collection of nodes.

use serde_json::Value;

use crate::{
    error::{Error, Result},
    node::{Node, NodeKind, json_shape},
    report::{Issue, Reporter},
};

/// An ordered list whose elements all share one kind. Serializes to a JSON array.
///
/// The element kind is either declared up front or taken from the first
/// element added or decoded. Once set it never changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListNode {
    items: Vec<Node>,
    sub_kind: Option<NodeKind>,
}

impl ListNode {
    /// Empty list with no element kind yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty list that only accepts elements of `kind`.
    pub fn of_kind(kind: NodeKind) -> Self {
        Self {
            items: Vec::new(),
            sub_kind: Some(kind),
        }
    }

    /// Build a list from initial elements.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if an element disagrees with `sub_kind` or with
    /// the first element when `sub_kind` is `None`.
    pub fn with_items(
        items: impl IntoIterator<Item = Node>,
        sub_kind: Option<NodeKind>,
    ) -> Result<Self> {
        let mut list = Self {
            items: Vec::new(),
            sub_kind,
        };
        for item in items {
            list.add(item)?;
        }
        Ok(list)
    }

    /// Kind every element must have, if fixed yet.
    pub fn sub_kind(&self) -> Option<NodeKind> {
        self.sub_kind
    }

    /// Append `node`. The first element fixes the list's kind if unset.
    pub fn add(&mut self, node: Node) -> Result<()> {
        match self.sub_kind {
            None => self.sub_kind = Some(node.kind()),
            Some(kind) if kind != node.kind() => {
                return Err(Error::type_mismatch(
                    &format!("[{}]", self.items.len()),
                    kind,
                    node.kind(),
                ));
            }
            Some(_) => {}
        }
        self.items.push(node);
        Ok(())
    }

    /// Element at `index`, or [`Error::IndexOutOfRange`].
    pub fn get(&self, index: usize) -> Result<&Node> {
        let len = self.items.len();
        self.items
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Mutable [`ListNode::get`].
    pub fn get_mut(&mut self, index: usize) -> Result<&mut Node> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Detach and return the element at `index`. The element kind stays.
    pub fn remove(&mut self, index: usize) -> Result<Node> {
        if index >= self.items.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Number of elements.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.items.iter()
    }

    /// Owned snapshot of the elements.
    pub fn get_value(&self) -> Vec<Node> {
        self.items.clone()
    }

    /// Serialize the elements into a JSON array.
    pub fn to_json(&self) -> Value {
        let mut array = Vec::with_capacity(self.items.len());
        for item in &self.items {
            item.append_to_array(&mut array);
        }
        Value::Array(array)
    }

    /// Rebuild the list from a JSON array.
    ///
    /// Elements whose kind cannot be inferred, or that disagree with the
    /// list's kind, are skipped and passed to `reporter`.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if `value` is not an array.
    pub fn from_json(&mut self, value: &Value, reporter: &dyn Reporter) -> Result<()> {
        match value {
            Value::Array(items) => self.decode(items, "", reporter),
            other => Err(Error::type_mismatch("", NodeKind::List, json_shape(other))),
        }
    }

    pub(crate) fn decode(
        &mut self,
        items: &[Value],
        at: &str,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        let mut decoded = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let path = format!("{at}[{index}]");
            let Some(kind) = NodeKind::infer(item) else {
                reporter.report(&Issue::NoInferredKind {
                    path,
                    value: item.to_string(),
                });
                continue;
            };
            match self.sub_kind {
                Some(expected) if expected != kind => {
                    reporter.report(&Issue::TypeMismatch {
                        path,
                        expected,
                        found: json_shape(item).to_string(),
                    });
                    continue;
                }
                Some(_) => {}
                None => self.sub_kind = Some(kind),
            }
            let mut node = Node::instantiate(kind, "");
            node.decode(item, &path, reporter)?;
            decoded.push(node);
        }
        self.items = decoded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{group::GroupNode, report::MemoryReporter};

    fn booleans(values: &[bool]) -> Vec<Node> {
        values.iter().map(|v| Node::boolean("", *v)).collect()
    }

    #[test]
    fn test_first_add_fixes_kind() {
        let mut list = ListNode::new();
        assert_eq!(list.sub_kind(), None);
        list.add(Node::boolean("", true)).unwrap();
        assert_eq!(list.sub_kind(), Some(NodeKind::Boolean));

        let err = list.add(Node::string("", "x")).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(list.size(), 1);
    }

    #[test]
    fn test_with_items_validates() {
        let list = ListNode::with_items(booleans(&[true, false, true]), None);
        assert_eq!(list.unwrap().size(), 3);

        let mixed = vec![Node::boolean("", true), Node::string("", "x")];
        let mixed = ListNode::with_items(mixed, Some(NodeKind::Boolean));
        assert!(mixed.is_err());
        let numbers = vec![Node::number("", 1)];
        let numbers = ListNode::with_items(numbers, Some(NodeKind::String));
        assert!(numbers.is_err());

        let lists = vec![Node::list("", ListNode::new()); 2];
        let nested = ListNode::with_items(lists, Some(NodeKind::List)).unwrap();
        assert_eq!(nested.size(), 2);
    }

    #[test]
    fn test_index_access() {
        let items = vec![Node::string("", "a"), Node::string("", "b")];
        let mut list = ListNode::with_items(items, None).unwrap();
        assert_eq!(list.get(0).unwrap().as_str().unwrap(), "a");
        assert_eq!(list.get(1).unwrap().as_str().unwrap(), "b");
        let err = list.get(2).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 2, len: 2 }));

        assert_eq!(list.remove(0).unwrap().as_str().unwrap(), "a");
        assert_eq!(list.size(), 1);
        assert_eq!(list.remove(0).unwrap().as_str().unwrap(), "b");
        assert!(list.is_empty());
        assert!(list.remove(0).is_err());
        assert_eq!(list.sub_kind(), Some(NodeKind::String));
    }

    #[test]
    fn test_to_json() {
        assert_eq!(ListNode::of_kind(NodeKind::Number).to_json(), json!([]));

        let inner = ListNode::with_items(booleans(&[false; 3]), None).unwrap();
        let mut group = GroupNode::new();
        group.add(Node::list("nested", inner));
        let mut list = ListNode::of_kind(NodeKind::Group);
        list.add(Node::group("", group)).unwrap();

        let expected = json!([{"nested": [false, false, false]}]);
        assert_eq!(list.to_json(), expected);
    }

    #[test]
    fn test_from_json_replaces_contents() {
        let reporter = MemoryReporter::new();
        let mut list = ListNode::with_items(booleans(&[true; 2]), None).unwrap();
        list.from_json(&json!([]), &reporter).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.sub_kind(), Some(NodeKind::Boolean));
    }

    #[test]
    fn test_from_json_infers_kind() {
        let reporter = MemoryReporter::new();
        let mut list = ListNode::new();
        let value = json!([[1, 1, 1], [1, 1, 1], [1, 1, 1]]);
        list.from_json(&value, &reporter).unwrap();
        assert_eq!(list.size(), 3);
        assert_eq!(list.sub_kind(), Some(NodeKind::List));
        assert_eq!(list.get(0).unwrap().as_list().unwrap().size(), 3);

        let mut list = ListNode::new();
        let value = json!([{"list": [false, false, false]}]);
        list.from_json(&value, &reporter).unwrap();
        let group = list.get(0).unwrap().as_group().unwrap();
        let inner = group.get("list").unwrap().as_list().unwrap();
        assert_eq!(inner.size(), 3);
        assert!(reporter.issues().is_empty());
    }

    #[test]
    fn test_from_json_skips_mismatched_elements() {
        let reporter = MemoryReporter::new();
        let mut list = ListNode::new();
        let value = json!([1, "two", null, 3]);
        list.from_json(&value, &reporter).unwrap();

        assert_eq!(list.sub_kind(), Some(NodeKind::Number));
        assert_eq!(list.to_json(), json!([1, 3]));
        assert_eq!(
            reporter.issues(),
            vec![
                Issue::TypeMismatch {
                    path: "[1]".into(),
                    expected: NodeKind::Number,
                    found: "string".into(),
                },
                Issue::NoInferredKind {
                    path: "[2]".into(),
                    value: "null".into(),
                },
            ]
        );
    }

    #[test]
    fn test_from_json_respects_declared_kind() {
        let reporter = MemoryReporter::new();
        let mut list = ListNode::of_kind(NodeKind::String);
        let value = json!([1, "a", true, "b"]);
        list.from_json(&value, &reporter).unwrap();
        assert_eq!(list.to_json(), json!(["a", "b"]));
        assert_eq!(reporter.issues().len(), 2);
    }

    #[test]
    fn test_get_value_is_a_snapshot() {
        let mut list = ListNode::new();
        list.add(Node::number("", 1)).unwrap();
        let mut snapshot = list.get_value();
        snapshot.clear();
        assert_eq!(list.size(), 1);
    }
}
