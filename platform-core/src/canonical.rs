//! Deterministic parameter canonicalization.
//!
//! A [`ParameterValue`] tree is flattened into one string that is identical
//! for semantically equal inputs, whatever the original key order. The
//! string is the input of the signature digest, so every rule here is part
//! of the wire contract:
//!
//! 1. keys are sorted by code point (`BTreeMap` order)
//! 2. entries whose value is null, empty or blank are skipped, as are keys
//!    listed in `ignore_keys`
//! 3. string arrays are joined with `,` after trimming and dropping blank
//!    elements, in their given order
//! 4. each surviving entry contributes `key + value + separator`
//! 5. nested objects, and objects inside arrays, are emitted as compact JSON
//!    with sorted keys and their original JSON types
//!
//! Scalars are emitted untrimmed; trimming only decides whether an entry is
//! blank.
//!
//! # Example
//!
//! ```rust
//! use platform_core::canonical::{ParameterValue, canonicalize};
//! use serde_json::json;
//!
//! let params = ParameterValue::from(json!({"name": "X", "dataId": 12, "empty": " "}));
//! assert_eq!(canonicalize(&params, "", &[]), "dataId12nameX");
//! ```

use serde_json::Value;
use std::collections::BTreeMap;

/// Separator placed between array elements.
pub const ARRAY_ELEMENT_SEPARATOR: &str = ",";

/// Heterogeneous parameter structure accepted by the signer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParameterValue {
    /// Absent value.
    #[default]
    Null,
    /// Any scalar, in its string form.
    Scalar(String),
    /// Ordered list of strings.
    StringArray(Vec<String>),
    /// Mapping with keys kept in code-point order.
    Object(BTreeMap<String, ParameterValue>),
    /// Nested JSON object or array kept with its types, rendered as compact
    /// JSON with sorted keys.
    Json(Value),
}

impl ParameterValue {
    /// Creates a scalar value.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Creates a string array value.
    pub fn array<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::StringArray(items.into_iter().map(Into::into).collect())
    }

    /// Returns `true` for [`ParameterValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the entries if this is an object.
    pub fn as_object(&self) -> Option<&BTreeMap<String, ParameterValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Renders the value as it appears after its key in the canonical
    /// string, or `None` if the entry must be skipped.
    pub fn canonical_value(&self) -> Option<String> {
        let rendered = match self {
            Self::Null => return None,
            Self::Scalar(s) => s.clone(),
            Self::StringArray(items) => join_trimmed(items),
            Self::Object(_) => self.to_json().to_string(),
            Self::Json(value) => sorted_json(value).to_string(),
        };
        if rendered.trim().is_empty() {
            None
        } else {
            Some(rendered)
        }
    }

    /// Converts back to JSON with keys in sorted order.
    ///
    /// Scalars become JSON strings, since their original JSON type is not
    /// retained. [`ParameterValue::Json`] values keep theirs.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Scalar(s) => Value::String(s.clone()),
            Self::StringArray(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Json(value) => sorted_json(value),
        }
    }
}

/// Rebuilds `value` with every object's keys inserted in code-point order.
fn sorted_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, sorted_json(v))).collect();
            Value::Object(sorted.into_iter().map(|(k, v)| (k.clone(), v)).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_json).collect()),
        other => other.clone(),
    }
}

fn join_trimmed(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(ARRAY_ELEMENT_SEPARATOR)
}

/// String form of an array element.
fn element_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => sorted_json(value).to_string(),
        other => other.to_string(),
    }
}

/// Converts an entry value of an object. Nested objects keep their JSON
/// types.
fn entry_value(value: &Value) -> ParameterValue {
    match value {
        Value::Object(_) => ParameterValue::Json(value.clone()),
        other => ParameterValue::from(other),
    }
}

impl From<&Value> for ParameterValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(s) => Self::Scalar(s.clone()),
            Value::Bool(_) | Value::Number(_) => Self::Scalar(value.to_string()),
            Value::Array(items) => Self::StringArray(items.iter().map(element_text).collect()),
            Value::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), entry_value(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for ParameterValue {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for ParameterValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringArray(value)
    }
}

impl From<BTreeMap<String, ParameterValue>> for ParameterValue {
    fn from(value: BTreeMap<String, ParameterValue>) -> Self {
        Self::Object(value)
    }
}

impl<K: Into<String>, V: Into<ParameterValue>> FromIterator<(K, V)> for ParameterValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Canonicalizes an object's entries.
///
/// Anything other than [`ParameterValue::Object`] yields an empty string.
pub fn canonicalize(value: &ParameterValue, separator: &str, ignore_keys: &[&str]) -> String {
    match value {
        ParameterValue::Object(entries) => canonicalize_entries(entries, separator, ignore_keys),
        _ => String::new(),
    }
}

/// Canonicalizes a sorted map of entries.
pub fn canonicalize_entries(
    entries: &BTreeMap<String, ParameterValue>,
    separator: &str,
    ignore_keys: &[&str],
) -> String {
    let mut out = String::new();
    for (key, value) in entries {
        if ignore_keys.contains(&key.as_str()) {
            continue;
        }
        if let Some(rendered) = value.canonical_value() {
            out.push_str(key);
            out.push_str(&rendered);
            out.push_str(separator);
        }
    }
    out
}
