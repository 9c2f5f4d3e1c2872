use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use super::{
    ChangeEvent, ChangeListener, FetchRequest, ListenerRegistry, LiveStore, StoreError,
    SubscriptionId,
};
use crate::{
    Result,
    record::{Record, RecordId},
};

/// An in-memory, row-based live store
///
/// `MemoryStore` keeps one ordered table of records per registered object type,
/// similar to a database table with automatic primary key generation.
///
/// # Features
/// - Automatically generates UUIDv4 primary keys for new records
/// - Provides CRUD operations (Create, Read, Update, Delete) per object type
/// - Groups several mutations into one change notification with [`write`](Self::write)
/// - Notifies listeners after every committed mutation, outside of any lock
///
/// Records keep their insertion position; replacing a record with
/// [`set`](Self::set) keeps its position. Fetches without sort descriptors
/// therefore return records in insertion order, and ties under the requested
/// descriptors are broken by insertion order.
///
/// # Type Parameters
/// - `T`: The record type to be stored. Objects are shared behind an `Arc`, so
///   `T` does not need to be `Clone`.
pub struct MemoryStore<T> {
    tables: RwLock<HashMap<String, Vec<Record<T>>>>,
    listeners: ListenerRegistry,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            listeners: ListenerRegistry::new(),
        }
    }
}

impl<T> MemoryStore<T> {
    /// Creates an empty store with no object types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given object types registered.
    pub fn with_types<I, S>(object_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for object_type in object_types {
            store.register_type(object_type);
        }
        store
    }

    fn read_tables(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<Record<T>>>> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tables(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<Record<T>>>> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers an object type.
    ///
    /// Returns false if the type was already registered; its records are kept.
    pub fn register_type(&self, object_type: impl Into<String>) -> bool {
        let object_type = object_type.into();
        let mut tables = self.write_tables();
        if tables.contains_key(&object_type) {
            return false;
        }
        tracing::debug!("Registering object type '{object_type}'");
        tables.insert(object_type, Vec::new());
        true
    }

    /// Retrieves a record by its primary key.
    ///
    /// # Errors
    /// * `StoreError::UnknownObjectType` if `object_type` is not registered
    /// * `StoreError::RecordNotFound` if no record exists with the given key
    pub fn get(&self, object_type: &str, id: impl Into<RecordId>) -> Result<Record<T>> {
        let id = id.into();
        let tables = self.read_tables();
        let rows = table(&tables, object_type)?;
        rows.iter().find(|r| *r.id() == id).cloned().ok_or_else(|| {
            StoreError::RecordNotFound {
                object_type: object_type.to_string(),
                id,
            }
            .into()
        })
    }

    /// Inserts a new record and returns its generated primary key.
    pub fn insert(&self, object_type: &str, object: T) -> Result<RecordId> {
        let id = RecordId::generate();
        self.set(object_type, id.clone(), object)?;
        Ok(id)
    }

    /// Inserts or replaces the record stored under `id`.
    ///
    /// A replaced record keeps its position in the table; a new one is appended.
    pub fn set(&self, object_type: &str, id: impl Into<RecordId>, object: T) -> Result<()> {
        let id = id.into();
        {
            let mut tables = self.write_tables();
            let table = table_mut(&mut tables, object_type)?;
            put(table, id.clone(), object);
        }
        self.publish(ChangeEvent::Put {
            object_type: object_type.to_string(),
            id,
        });
        Ok(())
    }

    /// Deletes a record by its primary key.
    ///
    /// # Returns
    /// * `Ok(true)` - If a record existed and was deleted
    /// * `Ok(false)` - If no record existed with the given key
    pub fn delete(&self, object_type: &str, id: impl Into<RecordId>) -> Result<bool> {
        let id = id.into();
        let removed = {
            let mut tables = self.write_tables();
            let table = table_mut(&mut tables, object_type)?;
            remove(table, &id)
        };
        if removed {
            self.publish(ChangeEvent::Delete {
                object_type: object_type.to_string(),
                id,
            });
        }
        Ok(removed)
    }

    /// Applies several mutations atomically and publishes a single
    /// [`ChangeEvent::Bulk`] for them.
    ///
    /// No event is published if the batch touched nothing.
    ///
    /// The table lock is held while `f` runs, so `f` must only use the
    /// [`WriteBatch`] it is given. Calling other methods of this store from
    /// inside `f` deadlocks.
    pub fn write<R>(
        &self,
        object_type: &str,
        f: impl FnOnce(&mut WriteBatch<'_, T>) -> R,
    ) -> Result<R> {
        let (result, touched) = {
            let mut tables = self.write_tables();
            let table = table_mut(&mut tables, object_type)?;
            let mut batch = WriteBatch {
                rows: table,
                touched: Vec::new(),
            };
            let result = f(&mut batch);
            (result, batch.touched)
        };

        if !touched.is_empty() {
            self.publish(ChangeEvent::Bulk {
                object_type: object_type.to_string(),
                ids: touched,
            });
        }
        Ok(result)
    }

    /// Number of records stored for `object_type`.
    pub fn len(&self, object_type: &str) -> Result<usize> {
        let tables = self.read_tables();
        Ok(table(&tables, object_type)?.len())
    }

    /// Every record of `object_type` in table order.
    pub fn all(&self, object_type: &str) -> Result<Vec<Record<T>>> {
        let tables = self.read_tables();
        Ok(table(&tables, object_type)?.clone())
    }

    /// Number of change listeners currently registered.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn publish(&self, event: ChangeEvent) {
        let delivered = self.listeners.notify(&event);
        tracing::trace!(
            "Published change to {delivered} listener(s) for '{}'",
            event.object_type()
        );
    }
}

impl<T: Send + Sync> LiveStore<T> for MemoryStore<T> {
    fn contains_type(&self, object_type: &str) -> bool {
        self.read_tables().contains_key(object_type)
    }

    fn fetch(&self, request: &FetchRequest<T>) -> Result<Vec<Record<T>>> {
        // Copy the rows out first: predicates and key paths run without the lock.
        let rows = self.all(request.object_type())?;
        Ok(request.apply(rows))
    }

    fn subscribe(&self, object_type: &str, listener: ChangeListener) -> Result<SubscriptionId> {
        if !self.contains_type(object_type) {
            return Err(StoreError::UnknownObjectType {
                object_type: object_type.to_string(),
            }
            .into());
        }
        Ok(self.listeners.add(object_type, listener))
    }

    fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
        self.listeners.remove(subscription)
    }
}

/// Mutations staged inside [`MemoryStore::write`].
pub struct WriteBatch<'a, T> {
    rows: &'a mut Vec<Record<T>>,
    touched: Vec<RecordId>,
}

impl<T> WriteBatch<'_, T> {
    /// Inserts a new record and returns its generated primary key.
    pub fn insert(&mut self, object: T) -> RecordId {
        let id = RecordId::generate();
        self.set(id.clone(), object);
        id
    }

    /// Inserts or replaces the record stored under `id`.
    pub fn set(&mut self, id: impl Into<RecordId>, object: T) {
        let id = id.into();
        put(self.rows, id.clone(), object);
        self.touched.push(id);
    }

    /// Deletes a record; returns false if it did not exist.
    pub fn delete(&mut self, id: impl Into<RecordId>) -> bool {
        let id = id.into();
        let removed = remove(self.rows, &id);
        if removed {
            self.touched.push(id);
        }
        removed
    }

    /// Looks up a record, including changes staged earlier in this batch.
    pub fn get(&self, id: impl Into<RecordId>) -> Option<Record<T>> {
        let id = id.into();
        self.rows.iter().find(|r| *r.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn table<'a, T>(
    tables: &'a HashMap<String, Vec<Record<T>>>,
    object_type: &str,
) -> Result<&'a Vec<Record<T>>> {
    tables.get(object_type).ok_or_else(|| {
        StoreError::UnknownObjectType {
            object_type: object_type.to_string(),
        }
        .into()
    })
}

fn table_mut<'a, T>(
    tables: &'a mut HashMap<String, Vec<Record<T>>>,
    object_type: &str,
) -> Result<&'a mut Vec<Record<T>>> {
    tables.get_mut(object_type).ok_or_else(|| {
        StoreError::UnknownObjectType {
            object_type: object_type.to_string(),
        }
        .into()
    })
}

fn put<T>(rows: &mut Vec<Record<T>>, id: RecordId, object: T) {
    let record = Record::new(id, object);
    match rows.iter_mut().find(|r| r.id() == record.id()) {
        Some(slot) => *slot = record,
        None => rows.push(record),
    }
}

fn remove<T>(rows: &mut Vec<Record<T>>, id: &RecordId) -> bool {
    match rows.iter().position(|r| r.id() == id) {
        Some(pos) => {
            rows.remove(pos);
            true
        }
        None => false,
    }
}
