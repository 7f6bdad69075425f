//! Grid rows.

use std::collections::HashMap;

use serde_json::Value;

use crate::column::NodeKey;

/// One record of grid data, keyed by column field.
///
/// # Example
///
/// ```
/// use gridweave::Row;
///
/// let row = Row::new()
///     .set("name", "Ada")
///     .set("age", 36);
///
/// assert_eq!(row.get("name").and_then(|v| v.as_str()), Some("Ada"));
/// assert!(row.get("missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    key: NodeKey,
    fields: HashMap<String, Value>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self {
            key: NodeKey::next(),
            fields: HashMap::new(),
        }
    }

    /// Build a row from an existing field map.
    pub fn from_fields(fields: HashMap<String, Value>) -> Self {
        Self {
            key: NodeKey::next(),
            fields,
        }
    }

    /// Node identity of this row.
    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// Set a field value (builder style).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Set a field value in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Iterate over all fields.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

impl From<serde_json::Map<String, Value>> for Row {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self::from_fields(map.into_iter().collect())
    }
}
