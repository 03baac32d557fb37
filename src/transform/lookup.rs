//! Defaulting accessors over untyped JSON
//!
//! Every accessor walks a path of object keys and returns `None` as soon as a
//! segment is missing or not an object, so callers pick the default.

use serde_json::{Map, Value};

/// Follows `path` through nested objects starting at `root`
pub fn get_path<'a>(root: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(root.get(*first)?, |value, key| value.as_object()?.get(*key))
}

/// String at `path`; numbers and booleans are rendered as text
pub fn string_at(root: &Map<String, Value>, path: &[&str]) -> Option<String> {
    match get_path(root, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Number at `path`; numeric strings are parsed
pub fn number_at(root: &Map<String, Value>, path: &[&str]) -> Option<f64> {
    match get_path(root, path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Array at `path`
pub fn array_at<'a>(root: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Vec<Value>> {
    get_path(root, path)?.as_array()
}
