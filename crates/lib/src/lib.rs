//!
//! Sectioned: live, sectioned query results over a reactive object store.
//! This library turns a filtered, sorted live query into the shape list and
//! table UIs consume: ordered named sections, index-path addressing and
//! section-level change notifications.
//!
//! ## Core Concepts
//!
//! * **Live stores (`store::LiveStore`)**: The capability the controller consumes: run a fetch request against an object type and notify listeners when that type changes. `store::MemoryStore` is the in-memory implementation.
//! * **Records (`record::Record`)**: A fetched object together with the store id that defines its identity.
//! * **Key paths (`keypath::KeyPath`)**: Field extractors used for ordering (`sort::SortDescriptor`) and for section names.
//! * **Fetch configuration (`config::FetchConfig`)**: Object type, predicate, primary sort and the optional section sort and section name key path, validated once at build time.
//! * **Sections (`section::SectionInfo`)**: Named runs of records with an index title, rebuilt on every change and diffed by name.
//! * **Results controller (`controller::ResultsController`)**: Owns the fetch, the computed sections and the store subscription, and reports section changes to a `controller::ResultsDelegate`.

pub mod config;
pub mod controller;
pub mod keypath;
pub mod predicate;
pub mod record;
pub mod section;
pub mod sort;
pub mod store;

pub use config::{FetchConfig, FetchConfigBuilder};
pub use controller::{ResultsController, ResultsDelegate};
pub use keypath::KeyPath;
pub use predicate::Predicate;
pub use record::{IndexPath, Record, RecordId};
pub use section::{SectionChangeType, SectionInfo};
pub use sort::SortDescriptor;
pub use store::{LiveStore, MemoryStore};

/// Result type used throughout the Sectioned library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Sectioned library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured live store errors from the store module
    #[error(transparent)]
    Store(store::StoreError),

    /// Invalid query configuration from the config module
    #[error(transparent)]
    Configuration(config::ConfigurationError),

    /// Accessor errors from the controller module
    #[error(transparent)]
    Controller(controller::ControllerError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Store(_) => "store",
            Error::Configuration(_) => "config",
            Error::Controller(_) => "controller",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a record or object type was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_not_found(),
            Error::Configuration(config_err) => config_err.is_unknown_type(),
            _ => false,
        }
    }

    /// Check if this error is store-related.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// Check if this error was caused by invalid configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Check if this error reports an index, section or title position out of range.
    pub fn is_index_out_of_range(&self) -> bool {
        match self {
            Error::Controller(controller_err) => controller_err.is_index_out_of_range(),
            _ => false,
        }
    }

    /// Check if this error is serialization-related.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
