//! Sort descriptors.

use std::{cmp::Ordering, fmt};

use serde_json::Value;

use crate::keypath::{KeyPath, compare_values};

/// Orders objects by the value of a key path.
pub struct SortDescriptor<T> {
    key_path: KeyPath<T>,
    ascending: bool,
}

impl<T> SortDescriptor<T> {
    pub fn new(key_path: KeyPath<T>, ascending: bool) -> Self {
        Self {
            key_path,
            ascending,
        }
    }

    pub fn ascending(key_path: KeyPath<T>) -> Self {
        Self::new(key_path, true)
    }

    pub fn descending(key_path: KeyPath<T>) -> Self {
        Self::new(key_path, false)
    }

    pub fn key_path(&self) -> &KeyPath<T> {
        &self.key_path
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// Returns a descriptor on the same key path with the opposite direction.
    pub fn reversed(&self) -> Self {
        Self::new(self.key_path.clone(), !self.ascending)
    }

    /// Evaluates the sort key for `object`.
    pub fn key(&self, object: &T) -> Value {
        self.key_path.evaluate(object)
    }

    /// Compares two already evaluated keys, honouring the direction.
    pub fn compare_keys(&self, a: &Value, b: &Value) -> Ordering {
        let ord = compare_values(a, b);
        if self.ascending { ord } else { ord.reverse() }
    }

    /// Compares two objects.
    ///
    /// Evaluates the key path twice; when sorting many objects prefer
    /// evaluating [`key`](Self::key) once per object and using
    /// [`compare_keys`](Self::compare_keys).
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.compare_keys(&self.key(a), &self.key(b))
    }
}

impl<T> Clone for SortDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key_path: self.key_path.clone(),
            ascending: self.ascending,
        }
    }
}

impl<T> fmt::Debug for SortDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortDescriptor")
            .field("key_path", &self.key_path.path())
            .field("ascending", &self.ascending)
            .finish()
    }
}

/// Stable-sorts `items` by a chain of descriptors.
///
/// Keys are evaluated once per item; ties under every descriptor keep their
/// input order.
pub fn sort_by_descriptors<T, I>(
    items: Vec<I>,
    descriptors: &[SortDescriptor<T>],
    object: impl Fn(&I) -> &T,
) -> Vec<I> {
    if descriptors.is_empty() {
        return items;
    }

    let mut keyed: Vec<(Vec<Value>, I)> = items
        .into_iter()
        .map(|item| {
            let keys = descriptors.iter().map(|d| d.key(object(&item))).collect();
            (keys, item)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        descriptors
            .iter()
            .zip(a.iter().zip(b))
            .map(|(d, (ka, kb))| d.compare_keys(ka, kb))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}
