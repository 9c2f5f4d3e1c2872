//! Observer interface for controller changes.

use super::ResultsController;
use crate::section::{SectionChangeType, SectionInfo};

/// Receives section-level change notifications from a [`ResultsController`].
///
/// Every method has an empty default, so implementors only override what they
/// use. Each change cycle that alters the section structure is reported as:
///
/// 1. [`will_change_content`](Self::will_change_content), while the controller
///    still exposes the previous state;
/// 2. zero or more [`did_change_section`](Self::did_change_section), deletes
///    first in ascending previous index, then inserts and count changes in
///    ascending new index;
/// 3. [`did_change_content`](Self::did_change_content).
///
/// From step 2 on the controller exposes the new state. Callbacks run on the
/// thread that mutated the store, with no controller lock held, so they may
/// call back into the controller or write to the store. Writes made inside a
/// callback are picked up by exactly one follow-up cycle.
///
/// The controller only keeps a weak reference to its delegate.
pub trait ResultsDelegate<T>: Send + Sync {
    /// The controller is about to report changes.
    fn will_change_content(&self, _controller: &ResultsController<T>) {}

    /// A section was inserted, deleted or changed its number of objects.
    ///
    /// For deletes `section` and `index` describe the section as it was in the
    /// previous list; otherwise they refer to the new list.
    fn did_change_section(
        &self,
        _controller: &ResultsController<T>,
        _section: &SectionInfo<T>,
        _index: usize,
        _change_type: SectionChangeType,
    ) {
    }

    /// The controller finished reporting changes.
    fn did_change_content(&self, _controller: &ResultsController<T>) {}

    /// Overrides the index title derived for a section name.
    ///
    /// Returning `None` keeps the default: the first character of the name,
    /// uppercased.
    fn section_index_title_for_section_name(
        &self,
        _controller: &ResultsController<T>,
        _name: &str,
    ) -> Option<String> {
        None
    }
}
