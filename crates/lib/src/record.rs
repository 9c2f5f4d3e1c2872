//! Record identity and index paths.
//!
//! A [`Record`] pairs the store-assigned [`RecordId`] with a shared handle to the
//! object itself. Two records refer to the same object exactly when their ids are
//! equal; the object payload never participates in identity.

use std::{fmt, ops::Deref, sync::Arc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned identifier of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new id from any string-like input.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Generates a fresh random (UUIDv4) id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&RecordId> for RecordId {
    fn from(id: &RecordId) -> Self {
        id.clone()
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A fetched object together with its store identity.
///
/// Cloning a `Record` is cheap: the object is shared behind an [`Arc`].
pub struct Record<T> {
    id: RecordId,
    object: Arc<T>,
}

impl<T> Record<T> {
    /// Wraps `object` under the given id.
    pub fn new(id: impl Into<RecordId>, object: T) -> Self {
        Self {
            id: id.into(),
            object: Arc::new(object),
        }
    }

    /// Wraps an already shared object under the given id.
    pub fn from_shared(id: impl Into<RecordId>, object: Arc<T>) -> Self {
        Self {
            id: id.into(),
            object,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn object(&self) -> &T {
        &self.object
    }

    /// The shared handle to the object.
    pub fn shared(&self) -> &Arc<T> {
        &self.object
    }

    /// Whether both records refer to the same stored object.
    pub fn is_same_object(&self, other: &Record<T>) -> bool {
        self.id == other.id
    }
}

impl<T> Clone for Record<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            object: Arc::clone(&self.object),
        }
    }
}

impl<T> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.object
    }
}

impl<T> PartialEq for Record<T> {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_object(other)
    }
}

impl<T> Eq for Record<T> {}

impl<T: fmt::Debug> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("id", &self.id)
            .field("object", &self.object)
            .finish()
    }
}

/// A (section, row) coordinate into a controller's sectioned results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, row): (usize, usize)) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}
