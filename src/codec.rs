//! JSON import/export codec.
//!
//! Import accepts a bare array of `[name, ...items]` entries or an object
//! wrapping one under `categories`, `MasterList` or `data` (in that order).
//! Export always writes the versioned [`Payload`] shape.

use crate::store::ListError;
use crate::types::{Category, Payload, ValidationError, normalize_value};
use chrono::NaiveDateTime;
use serde_json::{Value, json};

/// Fields checked, in priority order, when an import document is an object.
pub(crate) const IMPORT_FIELDS: &[&str] = &["categories", "MasterList", "data"];

/// Fields checked when reading a persisted snapshot.
pub(crate) const SNAPSHOT_FIELDS: &[&str] = &["categories"];

/// Prefix of every export filename.
const EXPORT_PREFIX: &str = "MasterListDB";

/// Check that a candidate is an array of arrays with non-blank names.
///
/// Duplicate names are allowed here.
pub fn validate(candidate: &Value) -> Result<(), ValidationError> {
    let rows = candidate.as_array().ok_or(ValidationError::MissingCategories)?;

    for (i, row) in rows.iter().enumerate() {
        let position = i + 1;
        let first = match row.as_array().and_then(|r| r.first()) {
            Some(first) => first,
            None => return Err(ValidationError::EntryNotArray { position }),
        };
        if normalize_value(first).is_empty() {
            return Err(ValidationError::EmptyName { position });
        }
    }

    Ok(())
}

/// Pick the candidate store out of a document.
pub fn extract_candidate<'a>(doc: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    match doc {
        Value::Array(_) => Some(doc),
        Value::Object(map) => fields
            .iter()
            .filter_map(|field| map.get(*field))
            .find(|v| !v.is_null()),
        _ => None,
    }
}

/// Validate a candidate and convert it to normalized categories.
pub fn categories_from_candidate(candidate: &Value) -> Result<Vec<Category>, ValidationError> {
    validate(candidate)?;

    let rows = candidate.as_array().ok_or(ValidationError::MissingCategories)?;
    let categories = rows
        .iter()
        .filter_map(Value::as_array)
        .map(|row| {
            let mut values = row.iter().map(normalize_value);
            let name = values.next().unwrap_or_default();
            Category {
                name,
                items: values.collect(),
            }
        })
        .collect();

    Ok(categories)
}

/// Parse raw import bytes into normalized categories.
///
/// Nothing is mutated here; the caller swaps the result in only on success.
pub fn parse_document(raw: &[u8]) -> Result<Vec<Category>, ListError> {
    let doc: Value = serde_json::from_slice(raw).map_err(|e| ListError::Parse(e.to_string()))?;
    let candidate = extract_candidate(&doc, IMPORT_FIELDS).ok_or(ValidationError::MissingCategories)?;
    Ok(categories_from_candidate(candidate)?)
}

/// Parse a persisted snapshot, tolerating the bare-array legacy shape.
pub fn parse_snapshot(text: &str) -> Result<Vec<Category>, ListError> {
    let doc: Value = serde_json::from_str(text).map_err(|e| ListError::Parse(e.to_string()))?;
    let candidate = extract_candidate(&doc, SNAPSHOT_FIELDS).ok_or(ValidationError::MissingCategories)?;
    Ok(categories_from_candidate(candidate)?)
}

/// Render a payload as compact JSON.
pub fn render_compact(payload: &Payload) -> String {
    payload_value(payload).to_string()
}

/// Render a payload as pretty-printed JSON (two-space indent).
pub fn render_pretty(payload: &Payload) -> String {
    format!("{:#}", payload_value(payload))
}

fn payload_value(payload: &Payload) -> Value {
    let categories: Vec<Value> = payload
        .categories
        .iter()
        .map(|c| {
            let mut row = Vec::with_capacity(c.items.len() + 1);
            row.push(Value::String(c.name.clone()));
            row.extend(c.items.iter().cloned().map(Value::String));
            Value::Array(row)
        })
        .collect();

    json!({
        "schema": payload.schema,
        "version": payload.version,
        "updatedAt": payload.updated_at,
        "categories": categories,
    })
}

/// Export filename: `MasterListDB_<YYYY-MM-DD>_<HH-MM>_v<N>.json`, local wall-clock time.
pub fn export_filename(at: NaiveDateTime, revision: u64) -> String {
    format!("{}_{}_v{}.json", EXPORT_PREFIX, at.format("%Y-%m-%d_%H-%M"), revision)
}
