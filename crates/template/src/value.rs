//! Variable tree and path resolution
//!
//! Merge data is a tree of mappings, sequences and leaves. Field paths such
//! as `to.name1` or `items.label` are resolved against it; inside a
//! repeated table row the row index selects the sequence entry.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A node of the variable tree
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<FixedOffset>),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

impl Value {
    /// An empty mapping
    pub fn empty() -> Self {
        Value::Mapping(BTreeMap::new())
    }

    /// Child of a mapping
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Whether this node can be written into a document
    pub fn is_leaf(&self) -> bool {
        matches!(self, Value::String(_) | Value::Number(_) | Value::Date(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Resolve a dotted path to a leaf
    ///
    /// For each segment, a sequence node whose entry at `index` has the key
    /// is entered first, then a plain key. A segment that matches neither is
    /// skipped and the walk continues from the same node.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use template::Value;
    ///
    /// let vars = Value::from(json!({
    ///     "to": { "name1": "Mueller" },
    ///     "items": [{ "label": "A" }, { "label": "B" }]
    /// }));
    ///
    /// assert_eq!(vars.resolve("to.name1", None), Some(&Value::from("Mueller")));
    /// assert_eq!(vars.resolve("items.label", Some(1)), Some(&Value::from("B")));
    /// assert_eq!(vars.resolve("to", None), None);
    /// ```
    pub fn resolve(&self, path: &str, index: Option<usize>) -> Option<&Value> {
        let mut node = self;

        for segment in path.split('.') {
            if let (Some(i), Value::Sequence(items)) = (index, node) {
                if let Some(next) = items.get(i).and_then(|entry| entry.get(segment)) {
                    node = next;
                    continue;
                }
            }
            if let Some(next) = node.get(segment) {
                node = next;
            }
        }

        node.is_leaf().then_some(node)
    }

    /// Number of repetitions a path selects
    ///
    /// Walks the path without an index and stops at the first sequence;
    /// its length is the count. Paths that never reach a sequence count 0.
    pub fn repeat_count(&self, path: &str) -> Option<usize> {
        let mut node = self;

        for segment in path.split('.') {
            if matches!(node, Value::Sequence(_)) {
                break;
            }
            if let Some(next) = node.get(segment) {
                node = next;
            }
        }

        match node {
            Value::Sequence(items) => Some(items.len()),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::Date(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
