//! Error types for controller accessors.

use thiserror::Error;

/// Errors returned by [`ResultsController`](super::ResultsController) accessors.
///
/// All of these are recoverable and leave the controller untouched.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Section index outside the current section list.
    #[error("Section {section} out of range ({count} sections)")]
    SectionOutOfRange {
        /// The requested section
        section: usize,
        /// Number of sections
        count: usize,
    },

    /// Row outside the requested section.
    #[error("Row {row} out of range in section {section} ({count} objects)")]
    RowOutOfRange {
        /// The requested section
        section: usize,
        /// The requested row
        row: usize,
        /// Number of objects in the section
        count: usize,
    },

    /// Position outside the section index title list.
    #[error("Section index title {index} out of range ({count} titles)")]
    TitleIndexOutOfRange {
        /// The requested title position
        index: usize,
        /// Number of titles
        count: usize,
    },
}

impl ControllerError {
    /// Check if this error reports an index outside current bounds.
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(
            self,
            ControllerError::SectionOutOfRange { .. }
                | ControllerError::RowOutOfRange { .. }
                | ControllerError::TitleIndexOutOfRange { .. }
        )
    }
}

impl From<ControllerError> for crate::Error {
    fn from(err: ControllerError) -> Self {
        crate::Error::Controller(err)
    }
}
