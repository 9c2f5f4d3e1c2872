//! Live object stores.
//!
//! A [`LiveStore`] is the capability a [`ResultsController`](crate::ResultsController)
//! consumes: it executes a [`FetchRequest`] against a named object type and
//! notifies registered listeners whenever that object type's collection changes.
//! How a store filters and orders records is its own business; the controller
//! only consumes the ordered result.
//!
//! [`MemoryStore`] is the in-crate implementation, a row-oriented in-memory
//! table per object type.

use std::fmt;

use crate::{Predicate, Result, SortDescriptor, record::Record, sort::sort_by_descriptors};

mod errors;
pub use errors::StoreError;

mod event;
pub use event::ChangeEvent;

mod listeners;
pub use listeners::{ChangeListener, ListenerRegistry, SubscriptionId};

mod memory;
pub use memory::{MemoryStore, WriteBatch};


/// A live, queryable and observable source of records of type `T`.
///
/// Implementations must deliver change notifications without holding any
/// internal lock, since listeners re-enter the store to fetch a fresh snapshot.
pub trait LiveStore<T>: Send + Sync {
    /// Whether the store can resolve `object_type`.
    fn contains_type(&self, object_type: &str) -> bool;

    /// Executes `request` and returns the matching records in request order.
    fn fetch(&self, request: &FetchRequest<T>) -> Result<Vec<Record<T>>>;

    /// Registers `listener` for changes to `object_type`.
    fn subscribe(&self, object_type: &str, listener: ChangeListener) -> Result<SubscriptionId>;

    /// Removes a listener. Returns false if it was not registered.
    fn unsubscribe(&self, subscription: SubscriptionId) -> bool;
}

/// A query against one object type: optional filter plus ordering.
pub struct FetchRequest<T> {
    object_type: String,
    predicate: Option<Predicate<T>>,
    sort_descriptors: Vec<SortDescriptor<T>>,
}

impl<T> FetchRequest<T> {
    /// An unfiltered, unordered request for every record of `object_type`.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            predicate: None,
            sort_descriptors: Vec::new(),
        }
    }

    pub fn with_predicate(mut self, predicate: Option<Predicate<T>>) -> Self {
        self.predicate = predicate;
        self
    }

    /// Appends a sort descriptor; earlier descriptors take precedence.
    pub fn sorted_by(mut self, descriptor: SortDescriptor<T>) -> Self {
        self.sort_descriptors.push(descriptor);
        self
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn predicate(&self) -> Option<&Predicate<T>> {
        self.predicate.as_ref()
    }

    pub fn sort_descriptors(&self) -> &[SortDescriptor<T>] {
        &self.sort_descriptors
    }

    /// Whether `object` passes the request's predicate.
    pub fn matches(&self, object: &T) -> bool {
        self.predicate.as_ref().is_none_or(|p| p.evaluate(object))
    }

    /// Filters and stable-sorts `records` according to this request.
    ///
    /// Helper for stores that hold their records in memory.
    pub fn apply(&self, records: Vec<Record<T>>) -> Vec<Record<T>> {
        let matching: Vec<Record<T>> = records
            .into_iter()
            .filter(|r| self.matches(r.object()))
            .collect();
        sort_by_descriptors(matching, &self.sort_descriptors, |r| r.object())
    }
}

impl<T> Clone for FetchRequest<T> {
    fn clone(&self) -> Self {
        Self {
            object_type: self.object_type.clone(),
            predicate: self.predicate.clone(),
            sort_descriptors: self.sort_descriptors.clone(),
        }
    }
}

impl<T> fmt::Debug for FetchRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("object_type", &self.object_type)
            .field("filtered", &self.predicate.is_some())
            .field("sort_descriptors", &self.sort_descriptors)
            .finish()
    }
}
