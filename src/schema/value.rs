//! Helpers over [`serde_json::Value`] configuration trees.
//!
//! Configuration values are plain JSON trees (with insertion order
//! preserved). This module provides the handful of operations the engine
//! needs on them: path lookup and write-back, the type coercion applied to
//! textual input, and the order-insensitive comparisons used by the change
//! tracker.

use std::collections::BTreeSet;

use anyhow::Context;
use serde_json::{Map, Value};

/// Human-readable name of a value's kind, for diagnostics.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

/// Looks up a value by segment sequence below `root`.
pub fn get_at<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Writes `value` at the segment sequence below `root`.
///
/// Intermediate mappings must already exist or be creatable; writing through
/// a scalar is an error.
pub fn set_at(root: &mut Value, segments: &[String], value: Value) -> anyhow::Result<()> {
    anyhow::ensure!(!segments.is_empty(), "empty config path");
    let mut current = root;
    for segment in &segments[..segments.len() - 1] {
        let object = current
            .as_object_mut()
            .with_context(|| format!("config node `{segment}` is not a mapping"))?;
        current = object
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    let leaf = &segments[segments.len() - 1];
    current
        .as_object_mut()
        .with_context(|| format!("config node `{leaf}` is not a mapping"))?
        .insert(leaf.clone(), value);
    Ok(())
}

/// Renders a value as a single display cell.
pub fn as_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Normalizes a candidate to the baseline's loaded type.
///
/// Textual input is parsed into the baseline's kind where possible; a
/// candidate that cannot be parsed is kept as-is and will compare dirty.
pub fn coerce_like(candidate: &Value, baseline: &Value) -> Value {
    match (candidate, baseline) {
        (Value::String(s), Value::Bool(_)) => match s.trim() {
            t if t.eq_ignore_ascii_case("true") => Value::Bool(true),
            t if t.eq_ignore_ascii_case("false") => Value::Bool(false),
            _ => candidate.clone(),
        },
        (Value::String(s), Value::Number(n)) => {
            let trimmed = s.trim();
            if n.is_f64() {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| candidate.clone())
            } else {
                trimmed
                    .parse::<i64>()
                    .map(|i| Value::Number(i.into()))
                    .unwrap_or_else(|_| candidate.clone())
            }
        }
        (Value::Number(n), Value::Number(b)) if b.is_f64() && !n.is_f64() => n
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| candidate.clone()),
        _ => candidate.clone(),
    }
}

/// Order-insensitive element-set equality for list sections.
///
/// Duplicates collapse; elements compare by canonical JSON text.
pub fn set_eq(a: &[Value], b: &[Value]) -> bool {
    let keys = |items: &[Value]| -> BTreeSet<String> {
        items.iter().map(|v| v.to_string()).collect()
    };
    keys(a) == keys(b)
}

/// Flattens a grid candidate or baseline into a set of row tuples.
///
/// A mapping yields its key/value pairs, an array of rows yields
/// (first, second) cells, an array of scalars yields (cell, "").
/// Returns `None` for values that are not grid-shaped.
pub fn grid_pairs(value: &Value) -> Option<BTreeSet<(String, String)>> {
    match value {
        Value::Object(map) => Some(
            map.iter()
                .map(|(key, item)| (key.clone(), as_cell(item)))
                .collect(),
        ),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::Array(cells) => (
                        cells.first().map(as_cell).unwrap_or_default(),
                        cells.get(1).map(as_cell).unwrap_or_default(),
                    ),
                    other => (as_cell(other), String::new()),
                })
                .collect(),
        ),
        _ => None,
    }
}
