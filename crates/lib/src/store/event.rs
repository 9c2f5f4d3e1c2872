//! ChangeEvent: a mutation committed to a live store.
//!
//! Delivered to every listener registered for the affected object type. This is
//! the store's row-level feed; controllers only use it as a trigger.

use serde::{Deserialize, Serialize};

use crate::record::RecordId;

/// A change committed to one object type's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    /// A single record was inserted or replaced.
    Put { object_type: String, id: RecordId },
    /// A single record was deleted.
    Delete { object_type: String, id: RecordId },
    /// Several records were written in one batch.
    Bulk {
        object_type: String,
        ids: Vec<RecordId>,
    },
}

impl ChangeEvent {
    /// The object type that was affected.
    pub fn object_type(&self) -> &str {
        match self {
            Self::Put { object_type, .. }
            | Self::Delete { object_type, .. }
            | Self::Bulk { object_type, .. } => object_type,
        }
    }

    /// Ids of the records that were affected.
    pub fn ids(&self) -> Vec<&RecordId> {
        match self {
            Self::Put { id, .. } | Self::Delete { id, .. } => vec![id],
            Self::Bulk { ids, .. } => ids.iter().collect(),
        }
    }
}
