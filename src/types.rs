//! Core data types for MasterList.

use chrono::{SecondsFormat, Utc};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema revision written into every payload.
pub const SCHEMA_REVISION: u32 = 1;

/// Semantic version written into every payload.
pub const PAYLOAD_VERSION: u32 = 1;

/// A named group holding an ordered list of item strings.
///
/// On the wire a category is a flat array whose first element is the name:
/// `["Fruits", "Apple", "Banana"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub items: Vec<String>,
}

impl Category {
    /// Create an empty category. The name is stored as given.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Create a category with items.
    pub fn with_items<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len() + 1))?;
        seq.serialize_element(&self.name)?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let row = Vec::<String>::deserialize(deserializer)?;
        let mut row = row.into_iter();
        let name = row
            .next()
            .ok_or_else(|| de::Error::custom("category entry has no name"))?;
        Ok(Self {
            name,
            items: row.collect(),
        })
    }
}

/// Versioned wrapper around the store, used both for the persisted snapshot
/// and for export files.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub schema: u32,
    pub version: u32,
    /// ISO-8601 save time, not category mutation time
    pub updated_at: String,
    pub categories: Vec<Category>,
}

impl Payload {
    /// Wrap a snapshot of the given categories, stamped with the current time.
    pub fn snapshot(categories: &[Category]) -> Self {
        Self {
            schema: SCHEMA_REVISION,
            version: PAYLOAD_VERSION,
            updated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            categories: categories.to_vec(),
        }
    }
}

/// Trim surrounding whitespace.
pub fn normalize(s: &str) -> String {
    s.trim().to_string()
}

/// Coerce an arbitrary JSON value to normalized text.
///
/// Null becomes the empty string; scalars use their JSON text; strings are trimmed.
pub fn normalize_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => normalize(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            // whole floats print without a fraction: 1.0 -> "1", -0.0 -> "0"
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                if f == 0.0 {
                    "0".to_string()
                } else {
                    format!("{:.0}", f)
                }
            }
            _ => n.to_string(),
        },
        other => normalize(&other.to_string()),
    }
}

/// Structural problems found in an import candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The candidate itself is not an array.
    MissingCategories,
    /// Entry at 1-based `position` is not a non-empty array.
    EntryNotArray { position: usize },
    /// Entry at 1-based `position` has a blank name.
    EmptyName { position: usize },
}

impl ValidationError {
    /// 1-based position of the offending entry, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            ValidationError::MissingCategories => None,
            ValidationError::EntryNotArray { position } | ValidationError::EmptyName { position } => Some(*position),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingCategories => write!(f, "JSON is missing a categories array."),
            ValidationError::EntryNotArray { position } => {
                write!(f, "Category entry #{} is not a valid array.", position)
            }
            ValidationError::EmptyName { position } => {
                write!(f, "Category entry #{} has an empty name at [0].", position)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
