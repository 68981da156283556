//! Typed config nodes and their JSON codec.

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::{
    error::{Error, Result},
    group::GroupNode,
    list::ListNode,
    report::{LogReporter, Reporter},
};

/// Tag identifying which shape a [`Node`] has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `true` or `false`.
    Boolean,
    /// Integer or floating point number.
    Number,
    /// UTF-8 text.
    String,
    /// Ordered elements of a single kind.
    List,
    /// Uniquely keyed children.
    Group,
}

impl NodeKind {
    /// Lowercase name used in messages and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Boolean => "boolean",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::List => "list",
            NodeKind::Group => "group",
        }
    }

    /// Infer the node kind a JSON value decodes into.
    ///
    /// Returns `None` for `null`, which has no node representation.
    pub fn infer(value: &Value) -> Option<NodeKind> {
        match value {
            Value::Object(_) => Some(NodeKind::Group),
            Value::Array(_) => Some(NodeKind::List),
            Value::String(_) => Some(NodeKind::String),
            Value::Bool(_) => Some(NodeKind::Boolean),
            Value::Number(_) => Some(NodeKind::Number),
            Value::Null => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a JSON value's shape, for mismatch reports.
pub(crate) fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_variant(expected: NodeKind, actual: NodeKind) -> Error {
    Error::WrongVariant { expected, actual }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    /// Boolean payload.
    Boolean(bool),
    /// Numeric payload, integer or float.
    Number(Number),
    /// String payload.
    String(String),
    /// List payload.
    List(ListNode),
    /// Group payload.
    Group(GroupNode),
}

impl NodeValue {
    /// Kind tag of this payload.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeValue::Boolean(_) => NodeKind::Boolean,
            NodeValue::Number(_) => NodeKind::Number,
            NodeValue::String(_) => NodeKind::String,
            NodeValue::List(_) => NodeKind::List,
            NodeValue::Group(_) => NodeKind::Group,
        }
    }
}

/// A keyed, typed value in the config tree.
///
/// The kind is fixed at construction: the payload is only reachable through
/// accessors that keep the variant, so turning a number into a string means
/// building a new node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Name inside the parent group. Ignored for list elements.
    key: String,
    value: NodeValue,
}

impl Node {
    /// Node with an explicit payload.
    pub fn new(key: impl Into<String>, value: NodeValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Boolean node.
    pub fn boolean(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, NodeValue::Boolean(value))
    }

    /// Integer or float node.
    pub fn number(key: impl Into<String>, value: impl Into<Number>) -> Self {
        Self::new(key, NodeValue::Number(value.into()))
    }

    /// Floating point number node. Non-finite values are stored as `0`.
    pub fn float(key: impl Into<String>, value: f64) -> Self {
        let number = Number::from_f64(value).unwrap_or(Number::from(0));
        Self::new(key, NodeValue::Number(number))
    }

    /// String node.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, NodeValue::String(value.into()))
    }

    /// List node wrapping `list`.
    pub fn list(key: impl Into<String>, list: ListNode) -> Self {
        Self::new(key, NodeValue::List(list))
    }

    /// Group node wrapping `group`.
    pub fn group(key: impl Into<String>, group: GroupNode) -> Self {
        Self::new(key, NodeValue::Group(group))
    }

    /// Fresh empty node of `kind`: `false`, `0`, `""`, an unconstrained
    /// list or an empty group.
    pub fn instantiate(kind: NodeKind, key: impl Into<String>) -> Self {
        let value = match kind {
            NodeKind::Boolean => NodeValue::Boolean(false),
            NodeKind::Number => NodeValue::Number(Number::from(0)),
            NodeKind::String => NodeValue::String(String::new()),
            NodeKind::List => NodeValue::List(ListNode::new()),
            NodeKind::Group => NodeValue::Group(GroupNode::new()),
        };
        Self::new(key, value)
    }

    /// Same as [`NodeKind::infer`].
    pub fn infer_kind(value: &Value) -> Option<NodeKind> {
        NodeKind::infer(value)
    }

    /// Build a node for `value` by inferring its kind.
    ///
    /// Returns `Ok(None)` when no kind can be inferred.
    pub fn from_inferred(
        key: impl Into<String>,
        value: &Value,
        reporter: &dyn Reporter,
    ) -> Result<Option<Node>> {
        let key = key.into();
        let at = key.clone();
        Self::decoded(key, value, &at, reporter)
    }

    /// Like [`Node::from_inferred`], with `at` as the report path.
    pub(crate) fn decoded(
        key: impl Into<String>,
        value: &Value,
        at: &str,
        reporter: &dyn Reporter,
    ) -> Result<Option<Node>> {
        let Some(kind) = NodeKind::infer(value) else {
            return Ok(None);
        };
        let mut node = Node::instantiate(kind, key);
        node.decode(value, at, reporter)?;
        Ok(Some(node))
    }

    /// Key of the node inside its parent.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Kind tag of the payload.
    pub fn kind(&self) -> NodeKind {
        self.value.kind()
    }

    /// Borrow the payload.
    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    /// Drop the key and keep the payload.
    pub fn into_value(self) -> NodeValue {
        self.value
    }

    /// Narrow to a boolean, or [`Error::WrongVariant`].
    pub fn as_bool(&self) -> Result<bool> {
        match &self.value {
            NodeValue::Boolean(b) => Ok(*b),
            _ => Err(wrong_variant(NodeKind::Boolean, self.kind())),
        }
    }

    /// Narrow to a number, or [`Error::WrongVariant`].
    pub fn as_number(&self) -> Result<&Number> {
        match &self.value {
            NodeValue::Number(n) => Ok(n),
            _ => Err(wrong_variant(NodeKind::Number, self.kind())),
        }
    }

    /// Narrow to a string, or [`Error::WrongVariant`].
    pub fn as_str(&self) -> Result<&str> {
        match &self.value {
            NodeValue::String(s) => Ok(s),
            _ => Err(wrong_variant(NodeKind::String, self.kind())),
        }
    }

    /// Narrow to a list, or [`Error::WrongVariant`].
    pub fn as_list(&self) -> Result<&ListNode> {
        match &self.value {
            NodeValue::List(list) => Ok(list),
            _ => Err(wrong_variant(NodeKind::List, self.kind())),
        }
    }

    /// Mutable [`Node::as_list`].
    pub fn as_list_mut(&mut self) -> Result<&mut ListNode> {
        let actual = self.kind();
        match &mut self.value {
            NodeValue::List(list) => Ok(list),
            _ => Err(wrong_variant(NodeKind::List, actual)),
        }
    }

    /// Narrow to a group, or [`Error::WrongVariant`].
    pub fn as_group(&self) -> Result<&GroupNode> {
        match &self.value {
            NodeValue::Group(group) => Ok(group),
            _ => Err(wrong_variant(NodeKind::Group, self.kind())),
        }
    }

    /// Mutable [`Node::as_group`].
    pub fn as_group_mut(&mut self) -> Result<&mut GroupNode> {
        let actual = self.kind();
        match &mut self.value {
            NodeValue::Group(group) => Ok(group),
            _ => Err(wrong_variant(NodeKind::Group, actual)),
        }
    }

    /// Overwrite a boolean payload. Other kinds are [`Error::WrongVariant`].
    pub fn set_bool(&mut self, value: bool) -> Result<()> {
        match &mut self.value {
            NodeValue::Boolean(b) => *b = value,
            other => return Err(wrong_variant(NodeKind::Boolean, other.kind())),
        }
        Ok(())
    }

    /// Overwrite a number payload.
    pub fn set_number(&mut self, value: impl Into<Number>) -> Result<()> {
        match &mut self.value {
            NodeValue::Number(n) => *n = value.into(),
            other => return Err(wrong_variant(NodeKind::Number, other.kind())),
        }
        Ok(())
    }

    /// Overwrite a string payload.
    pub fn set_string(&mut self, value: impl Into<String>) -> Result<()> {
        match &mut self.value {
            NodeValue::String(s) => *s = value.into(),
            other => return Err(wrong_variant(NodeKind::String, other.kind())),
        }
        Ok(())
    }

    /// Serialize the node's value, ignoring its key.
    pub fn to_json(&self) -> Value {
        match &self.value {
            NodeValue::Boolean(b) => Value::Bool(*b),
            NodeValue::Number(n) => Value::Number(n.clone()),
            NodeValue::String(s) => Value::String(s.clone()),
            NodeValue::List(list) => list.to_json(),
            NodeValue::Group(group) => group.to_json(),
        }
    }

    /// Insert the node's value into `object` under its key.
    pub fn append_to_object(&self, object: &mut Map<String, Value>) {
        object.insert(self.key.clone(), self.to_json());
    }

    /// Push the node's value onto `array` as an anonymous element.
    pub fn append_to_array(&self, array: &mut Vec<Value>) {
        array.push(self.to_json());
    }

    /// Replace the node's value with `value`, decoded according to its kind.
    ///
    /// A value of the wrong shape is a [`Error::TypeMismatch`] and leaves the
    /// node untouched. Entries skipped inside groups and lists are passed to
    /// `reporter`.
    pub fn from_json(&mut self, value: &Value, reporter: &dyn Reporter) -> Result<()> {
        let at = self.key.clone();
        self.decode(value, &at, reporter)
    }

    /// [`Node::from_json`] with skipped entries going to the log.
    pub fn update_from_value(&mut self, value: &Value) -> Result<()> {
        self.from_json(value, &LogReporter)
    }

    pub(crate) fn decode(
        &mut self,
        value: &Value,
        at: &str,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        match (&mut self.value, value) {
            (NodeValue::Boolean(b), Value::Bool(v)) => *b = *v,
            (NodeValue::Number(n), Value::Number(v)) => *n = v.clone(),
            (NodeValue::String(s), Value::String(v)) => v.clone_into(s),
            (NodeValue::List(list), Value::Array(items)) => list.decode(items, at, reporter)?,
            (NodeValue::Group(group), Value::Object(entries)) => {
                group.decode(entries, at, reporter)?
            }
            (current, other) => {
                return Err(Error::type_mismatch(at, current.kind(), json_shape(other)));
            }
        }
        Ok(())
    }
}
