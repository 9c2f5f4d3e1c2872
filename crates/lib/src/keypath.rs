//! Key paths: named field extractors over records.
//!
//! A [`KeyPath`] turns an object into a [`serde_json::Value`]. It is used both
//! for ordering (see [`SortDescriptor`](crate::SortDescriptor)) and for deriving
//! section names.
//!
//! Two flavours exist:
//!
//! - [`KeyPath::new`] wraps a typed closure, e.g. `|c: &Contact| c.last_name.clone()`.
//! - [`KeyPath::json`] walks a dotted path (`"address.city"`) over the object's
//!   serde representation, for types that implement [`Serialize`].

use std::{cmp::Ordering, fmt, sync::Arc};

use serde::Serialize;
use serde_json::Value;

/// Closure type used to extract a key value from an object.
pub type Extractor<T> = dyn Fn(&T) -> Value + Send + Sync;

/// A named field extractor.
pub struct KeyPath<T> {
    path: String,
    extract: Arc<Extractor<T>>,
}

impl<T> KeyPath<T> {
    /// Creates a key path from a typed extractor.
    ///
    /// `path` is only a label used in logs and error messages.
    pub fn new<V, F>(path: impl Into<String>, extract: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            extract: Arc::new(move |object| extract(object).into()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Evaluates the key path against `object`.
    pub fn evaluate(&self, object: &T) -> Value {
        (self.extract)(object)
    }

    /// Evaluates the key path and converts the result into a section name.
    pub fn section_name(&self, object: &T) -> String {
        section_name_for_value(&self.evaluate(object))
    }
}

impl<T: Serialize + 'static> KeyPath<T> {
    /// Creates a key path that walks a dotted path over the object's JSON form.
    ///
    /// Object members are looked up by name and array elements by numeric
    /// index. A missing component evaluates to `Value::Null`. The path is
    /// normalized: leading, trailing and repeated dots are ignored.
    pub fn json(path: impl Into<String>) -> Self {
        let path = normalize_path(&path.into());
        let components: Vec<String> = path
            .split('.')
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        let label = path.clone();

        Self {
            path,
            extract: Arc::new(move |object| {
                let root = match serde_json::to_value(object) {
                    Ok(root) => root,
                    Err(e) => {
                        tracing::warn!("Failed to serialize object for key path '{label}': {e}");
                        return Value::Null;
                    }
                };
                lookup(root, &components)
            }),
        }
    }
}

impl<T> Clone for KeyPath<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<T> fmt::Debug for KeyPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPath").field("path", &self.path).finish()
    }
}

fn normalize_path(path: &str) -> String {
    path.split('.')
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

fn lookup(root: Value, components: &[String]) -> Value {
    let mut current = root;
    for component in components {
        current = match current {
            Value::Object(mut map) => map.remove(component.as_str()).unwrap_or(Value::Null),
            Value::Array(mut items) => match component.parse::<usize>() {
                Ok(i) if i < items.len() => items.swap_remove(i),
                _ => Value::Null,
            },
            _ => Value::Null,
        };
    }
    current
}

/// Converts an evaluated key into a section name.
///
/// Strings are used verbatim, `null` becomes the empty name and every other
/// value uses its JSON text.
pub fn section_name_for_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Total order over JSON values.
///
/// Ordering rules:
/// - null < bool < number < string < array < object
/// - numbers compare numerically, strings lexicographically by code point
/// - arrays compare element-wise, objects by their JSON text
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x.cmp(&y)
            } else {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.total_cmp(&y)
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (xa, ya) in x.iter().zip(y) {
                let ord = compare_values(xa, ya);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(_), Value::Object(_)) => a.to_string().cmp(&b.to_string()),
        _ => rank(a).cmp(&rank(b)),
    }
}
