//! Error types for live store operations.
//!
//! These variants cover the in-crate [`MemoryStore`](super::MemoryStore) and are
//! general enough for external [`LiveStore`](super::LiveStore) implementations to
//! report their own failures through.

use thiserror::Error;

use crate::record::RecordId;

/// Errors reported by a live store.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has no collection for the requested object type
    #[error("Unknown object type '{object_type}'")]
    UnknownObjectType { object_type: String },

    /// Record not found in the object type's collection
    #[error("Record not found in '{object_type}': {id}")]
    RecordNotFound { object_type: String, id: RecordId },

    /// The store failed to execute a fetch
    #[error("Fetch failed for '{object_type}': {reason}")]
    FetchFailed { object_type: String, reason: String },

    /// The store could not register a change listener
    #[error("Subscription failed for '{object_type}': {reason}")]
    SubscriptionFailed { object_type: String, reason: String },

    /// Implementation-specific error from a store type
    #[error("Store implementation error in '{object_type}': {reason}")]
    ImplementationError { object_type: String, reason: String },
}

impl StoreError {
    /// Check if this error indicates a record or collection was not found
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::RecordNotFound { .. } | StoreError::UnknownObjectType { .. }
        )
    }

    /// Check if this error indicates the object type is unknown to the store
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, StoreError::UnknownObjectType { .. })
    }

    /// Check if this error was raised while executing a fetch
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, StoreError::FetchFailed { .. })
    }

    /// Check if this error is implementation-specific
    pub fn is_implementation_error(&self) -> bool {
        matches!(self, StoreError::ImplementationError { .. })
    }

    /// Get the object type associated with this error
    pub fn object_type(&self) -> &str {
        match self {
            StoreError::UnknownObjectType { object_type }
            | StoreError::RecordNotFound { object_type, .. }
            | StoreError::FetchFailed { object_type, .. }
            | StoreError::SubscriptionFailed { object_type, .. }
            | StoreError::ImplementationError { object_type, .. } => object_type,
        }
    }

    /// Get the record id if this is a record-related error
    pub fn record_id(&self) -> Option<&RecordId> {
        match self {
            StoreError::RecordNotFound { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
