//! Query configuration for a results controller.
//!
//! A [`FetchConfig`] names the object type to query, the store to query it
//! against, how to filter and order the results and, optionally, how to split
//! them into sections. It is validated once by [`FetchConfigBuilder::build`] and
//! immutable afterwards.
//!
//! ```
//! use std::sync::Arc;
//! use sectioned::{FetchConfig, KeyPath, MemoryStore, SortDescriptor};
//!
//! struct Contact {
//!     last_name: String,
//! }
//!
//! let store = Arc::new(MemoryStore::<Contact>::with_types(["contacts"]));
//! let by_name = KeyPath::new("last_name", |c: &Contact| c.last_name.clone());
//! let initial = KeyPath::new("initial", |c: &Contact| {
//!     c.last_name.chars().next().map(String::from).unwrap_or_default()
//! });
//!
//! let config = FetchConfig::builder(store, "contacts", SortDescriptor::ascending(by_name))
//!     .section_sort_descriptor(SortDescriptor::ascending(initial.clone()))
//!     .section_name_key_path(initial)
//!     .build()
//!     .unwrap();
//! assert!(config.is_sectioned());
//! ```

use std::{fmt, sync::Arc};

use crate::{
    KeyPath, Predicate, Result, SortDescriptor,
    store::{FetchRequest, LiveStore},
};

mod errors;
pub use errors::ConfigurationError;


/// Immutable query configuration.
pub struct FetchConfig<T> {
    object_type: String,
    predicate: Option<Predicate<T>>,
    store: Arc<dyn LiveStore<T>>,
    sort_descriptor: SortDescriptor<T>,
    section_sort_descriptor: Option<SortDescriptor<T>>,
    section_name_key_path: Option<KeyPath<T>>,
}

impl<T: 'static> FetchConfig<T> {
    /// Starts a configuration for `object_type` in `store`, ordered by `sort_descriptor`.
    pub fn builder<S>(
        store: Arc<S>,
        object_type: impl Into<String>,
        sort_descriptor: SortDescriptor<T>,
    ) -> FetchConfigBuilder<T>
    where
        S: LiveStore<T> + 'static,
    {
        FetchConfigBuilder::new(store, object_type, sort_descriptor)
    }
}

impl<T> FetchConfig<T> {
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn predicate(&self) -> Option<&Predicate<T>> {
        self.predicate.as_ref()
    }

    pub fn store(&self) -> &Arc<dyn LiveStore<T>> {
        &self.store
    }

    pub fn sort_descriptor(&self) -> &SortDescriptor<T> {
        &self.sort_descriptor
    }

    pub fn section_sort_descriptor(&self) -> Option<&SortDescriptor<T>> {
        self.section_sort_descriptor.as_ref()
    }

    pub fn section_name_key_path(&self) -> Option<&KeyPath<T>> {
        self.section_name_key_path.as_ref()
    }

    /// Whether results are split into named sections.
    pub fn is_sectioned(&self) -> bool {
        self.section_name_key_path.is_some()
    }

    /// The section sort and section name key path, when sectioned.
    ///
    /// `build()` guarantees both halves are present or both absent.
    pub fn section_grouping(&self) -> Option<(&SortDescriptor<T>, &KeyPath<T>)> {
        self.section_sort_descriptor
            .as_ref()
            .zip(self.section_name_key_path.as_ref())
    }

    /// The request sent to the store: object type, predicate and primary sort.
    pub fn fetch_request(&self) -> FetchRequest<T> {
        FetchRequest::new(self.object_type.clone())
            .with_predicate(self.predicate.clone())
            .sorted_by(self.sort_descriptor.clone())
    }
}

impl<T> Clone for FetchConfig<T> {
    fn clone(&self) -> Self {
        Self {
            object_type: self.object_type.clone(),
            predicate: self.predicate.clone(),
            store: Arc::clone(&self.store),
            sort_descriptor: self.sort_descriptor.clone(),
            section_sort_descriptor: self.section_sort_descriptor.clone(),
            section_name_key_path: self.section_name_key_path.clone(),
        }
    }
}

impl<T> fmt::Debug for FetchConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchConfig")
            .field("object_type", &self.object_type)
            .field("predicate", &self.predicate)
            .field("sort_descriptor", &self.sort_descriptor)
            .field("section_sort_descriptor", &self.section_sort_descriptor)
            .field("section_name_key_path", &self.section_name_key_path)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FetchConfig`].
pub struct FetchConfigBuilder<T> {
    config: FetchConfig<T>,
}

impl<T: 'static> FetchConfigBuilder<T> {
    fn new<S>(
        store: Arc<S>,
        object_type: impl Into<String>,
        sort_descriptor: SortDescriptor<T>,
    ) -> Self
    where
        S: LiveStore<T> + 'static,
    {
        let store: Arc<dyn LiveStore<T>> = store;
        Self {
            config: FetchConfig {
                object_type: object_type.into(),
                predicate: None,
                store,
                sort_descriptor,
                section_sort_descriptor: None,
                section_name_key_path: None,
            },
        }
    }
}

impl<T> FetchConfigBuilder<T> {
    /// Only records accepted by `predicate` are fetched.
    pub fn predicate(mut self, predicate: Predicate<T>) -> Self {
        self.config.predicate = Some(predicate);
        self
    }

    /// Ordering that groups records with equal section names together.
    pub fn section_sort_descriptor(mut self, descriptor: SortDescriptor<T>) -> Self {
        self.config.section_sort_descriptor = Some(descriptor);
        self
    }

    /// Key path yielding each record's section name.
    pub fn section_name_key_path(mut self, key_path: KeyPath<T>) -> Self {
        self.config.section_name_key_path = Some(key_path);
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    /// * `ConfigurationError::EmptyObjectType` if the object type is empty
    /// * `ConfigurationError::MissingSectionSort` if only a section name key path was given
    /// * `ConfigurationError::MissingSectionNameKeyPath` if only a section sort was given
    pub fn build(self) -> Result<FetchConfig<T>> {
        let config = self.config;
        if config.object_type.is_empty() {
            return Err(ConfigurationError::EmptyObjectType.into());
        }

        let mismatch = match (&config.section_sort_descriptor, &config.section_name_key_path) {
            (None, Some(key_path)) => Some(ConfigurationError::MissingSectionSort {
                key_path: key_path.path().to_string(),
            }),
            (Some(descriptor), None) => Some(ConfigurationError::MissingSectionNameKeyPath {
                key_path: descriptor.key_path().path().to_string(),
            }),
            _ => None,
        };

        match mismatch {
            Some(err) => Err(err.into()),
            None => Ok(config),
        }
    }
}

impl<T> fmt::Debug for FetchConfigBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}
