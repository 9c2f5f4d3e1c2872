//! Configuration error types.
//!
//! Raised while building a [`FetchConfig`](super::FetchConfig) or constructing a
//! [`ResultsController`](crate::ResultsController) from one. No controller is
//! produced when any of these is returned.

use thiserror::Error;

/// Errors caused by invalid query configuration.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A section name key path was supplied without a section sort descriptor.
    #[error("Section name key path '{key_path}' requires a section sort descriptor")]
    MissingSectionSort {
        /// Path of the supplied section name key path
        key_path: String,
    },

    /// A section sort descriptor was supplied without a section name key path.
    #[error("Section sort descriptor on '{key_path}' requires a section name key path")]
    MissingSectionNameKeyPath {
        /// Path of the supplied section sort descriptor
        key_path: String,
    },

    /// The object type name is empty.
    #[error("Object type must not be empty")]
    EmptyObjectType,

    /// The store cannot resolve the configured object type.
    #[error("Store cannot resolve object type '{object_type}'")]
    UnknownObjectType {
        /// The object type that could not be resolved
        object_type: String,
    },
}

impl ConfigurationError {
    /// Check if only one half of the section sort / section key path pair was given.
    pub fn is_section_mismatch(&self) -> bool {
        matches!(
            self,
            ConfigurationError::MissingSectionSort { .. }
                | ConfigurationError::MissingSectionNameKeyPath { .. }
        )
    }

    /// Check if the object type could not be used.
    pub fn is_unknown_type(&self) -> bool {
        matches!(
            self,
            ConfigurationError::UnknownObjectType { .. } | ConfigurationError::EmptyObjectType
        )
    }
}

impl From<ConfigurationError> for crate::Error {
    fn from(err: ConfigurationError) -> Self {
        crate::Error::Configuration(err)
    }
}
