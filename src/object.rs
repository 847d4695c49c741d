//! Generic caller-supplied object graphs.
//!
//! Callers sometimes hold SRS information inside an arbitrary structure, such
//! as a decoded file header or a GeoJSON `crs` member, rather than as a single
//! string. [`ObjectValue`] models such a structure. Nodes are shared through
//! reference counting, so a graph may contain cycles; [`string_leaves`] walks it
//! with a visited set and a depth cap and always terminates.
//!
//! # Example
//!
//! ```
//! use ferro_srs::object::{string_leaves, ObjectNode, ObjectValue};
//!
//! let root = ObjectNode::new();
//! root.insert("name", ObjectValue::from("EPSG:4326"));
//! root.insert("self", ObjectValue::Node(root.clone()));
//!
//! let leaves = string_leaves(&ObjectValue::Node(root), 64);
//! assert_eq!(leaves, vec!["EPSG:4326".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// A value in a generic object graph.
#[derive(Debug, Clone)]
pub enum ObjectValue {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    List(Vec<ObjectValue>),
    /// Shared keyed node; may be referenced from several places, including itself
    Node(ObjectNode),
}

/// A shared, mutable keyed node. Keys keep insertion order.
#[derive(Clone, Default)]
pub struct ObjectNode(Rc<RefCell<Vec<(String, ObjectValue)>>>);

impl ObjectNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing an existing value in place.
    pub fn insert(&self, key: impl Into<String>, value: ObjectValue) {
        let key = key.into();
        let mut fields = self.0.borrow_mut();
        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => fields.push((key, value)),
        }
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<ObjectValue> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns true if both handles point at the same node.
    pub fn ptr_eq(&self, other: &ObjectNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

// Printing the fields would recurse forever on a cyclic graph.
impl fmt::Debug for ObjectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.0.borrow().iter().map(|(k, _)| k.clone()).collect();
        f.debug_struct("ObjectNode").field("keys", &keys).finish()
    }
}

impl From<&str> for ObjectValue {
    fn from(value: &str) -> Self {
        ObjectValue::Str(value.to_string())
    }
}

impl From<String> for ObjectValue {
    fn from(value: String) -> Self {
        ObjectValue::Str(value)
    }
}

impl From<ObjectNode> for ObjectValue {
    fn from(node: ObjectNode) -> Self {
        ObjectValue::Node(node)
    }
}

impl From<serde_json::Value> for ObjectValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ObjectValue::Null,
            Value::Bool(b) => ObjectValue::Bool(b),
            Value::Number(n) => n.as_f64().map_or(ObjectValue::Null, ObjectValue::Num),
            Value::String(s) => ObjectValue::Str(s),
            Value::Array(items) => ObjectValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                let node = ObjectNode::new();
                for (key, value) in map {
                    node.insert(key, value.into());
                }
                ObjectValue::Node(node)
            }
        }
    }
}

/// Collect every string leaf reachable from `root`, in traversal order.
///
/// Each node is visited at most once. Values nested deeper than `max_depth`
/// are not visited.
pub fn string_leaves(root: &ObjectValue, max_depth: usize) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut leaves = Vec::new();
    walk(root, 0, max_depth, &mut visited, &mut leaves);
    leaves
}

fn walk(
    value: &ObjectValue,
    depth: usize,
    max_depth: usize,
    visited: &mut HashSet<*const ()>,
    leaves: &mut Vec<String>,
) {
    if depth > max_depth {
        tracing::trace!("Object walk stopped at depth {}", depth);
        return;
    }
    match value {
        ObjectValue::Str(s) => leaves.push(s.clone()),
        ObjectValue::List(items) => {
            for item in items {
                walk(item, depth + 1, max_depth, visited, leaves);
            }
        }
        ObjectValue::Node(node) => {
            if !visited.insert(node.addr()) {
                return;
            }
            let fields = node.0.borrow();
            for (_, child) in fields.iter() {
                walk(child, depth + 1, max_depth, visited, leaves);
            }
        }
        ObjectValue::Null | ObjectValue::Bool(_) | ObjectValue::Num(_) => {}
    }
}
