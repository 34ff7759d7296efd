//! Per-item parameter access, the first of the two host boundaries.
//!
//! The host resolves expressions and renders the form; by the time the node
//! runs, each item's parameters are plain JSON values looked up by field
//! name. Collection fields may arrive either as a plain array or wrapped in
//! the host's fixed-collection shape (`{"videoUrls": {"videoUrl": [...]}}`);
//! both are accepted.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{NodeError, NodeResult};

/// Read access to the resolved parameters of a batch.
pub trait ParameterSource: Send + Sync {
    /// Number of input items in the batch.
    fn len(&self) -> usize;

    /// Returns true when the batch is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The resolved value of `field` for item `item_index`, if set.
    fn value_of(&self, field: &str, item_index: usize) -> Option<&Value>;
}

/// Parameter source backed by one JSON object per item. Used by embedders
/// and throughout the tests.
#[derive(Debug, Clone, Default)]
pub struct JsonParameterSource {
    items: Vec<serde_json::Map<String, Value>>,
}

impl JsonParameterSource {
    pub fn new(items: Vec<serde_json::Map<String, Value>>) -> Self {
        Self { items }
    }

    /// Builds a source from one `serde_json::Value` per item; non-object
    /// values are treated as items with no parameters set.
    pub fn from_values(items: Vec<Value>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|v| match v {
                    Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                })
                .collect(),
        }
    }
}

impl ParameterSource for JsonParameterSource {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn value_of(&self, field: &str, item_index: usize) -> Option<&Value> {
        self.items.get(item_index).and_then(|item| item.get(field))
    }
}

/// Reads a string field, falling back to `default` when unset.
pub fn read_string(
    source: &dyn ParameterSource,
    field: &str,
    item_index: usize,
    default: &str,
) -> NodeResult<String> {
    match source.value_of(field, item_index) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(NodeError::invalid_parameter(
            field,
            format!("expected a string, got {other}"),
        )),
    }
}

/// Reads a repeatable collection field as an ordered sequence of `T`,
/// defaulting to an empty sequence when the field is absent.
///
/// `entry` names the per-entry group inside the host's fixed-collection
/// wrapper (e.g. `videoUrl` inside `videoUrls`).
pub fn read_collection<T: DeserializeOwned>(
    source: &dyn ParameterSource,
    field: &str,
    entry: &str,
    item_index: usize,
) -> NodeResult<Vec<T>> {
    let value = match source.value_of(field, item_index) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(value) => value,
    };

    let entries = match value {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(wrapper) => match wrapper.get(entry) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(entries)) => entries.as_slice(),
            Some(other) => {
                return Err(NodeError::invalid_parameter(
                    field,
                    format!("expected '{entry}' to be an array, got {other}"),
                ))
            }
        },
        other => {
            return Err(NodeError::invalid_parameter(
                field,
                format!("expected a collection, got {other}"),
            ))
        }
    };

    entries
        .iter()
        .map(|entry_value| {
            serde_json::from_value(entry_value.clone())
                .map_err(|e| NodeError::invalid_parameter(field, e.to_string()))
        })
        .collect()
}

/// Reads an options field into its typed enum, falling back to the declared
/// default when unset.
pub fn read_option<T: DeserializeOwned>(
    source: &dyn ParameterSource,
    field: &str,
    item_index: usize,
    default: T,
) -> NodeResult<T> {
    match source.value_of(field, item_index) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| NodeError::invalid_parameter(field, e.to_string())),
    }
}
