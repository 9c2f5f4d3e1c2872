//! The results controller.
//!
//! A [`ResultsController`] runs one configured query against a
//! [`LiveStore`](crate::LiveStore), splits the results into sections and keeps
//! both up to date as the store changes, reporting section-level changes to a
//! [`ResultsDelegate`].
//!
//! ```
//! use std::sync::Arc;
//! use sectioned::{FetchConfig, IndexPath, KeyPath, MemoryStore, ResultsController, SortDescriptor};
//!
//! struct Task {
//!     title: &'static str,
//!     list: &'static str,
//! }
//!
//! let store = Arc::new(MemoryStore::with_types(["tasks"]));
//! store.insert("tasks", Task { title: "milk", list: "errands" }).unwrap();
//! store.insert("tasks", Task { title: "report", list: "work" }).unwrap();
//!
//! let list = KeyPath::new("list", |t: &Task| t.list);
//! let config = FetchConfig::builder(
//!     store.clone(),
//!     "tasks",
//!     SortDescriptor::ascending(KeyPath::new("title", |t: &Task| t.title)),
//! )
//! .section_sort_descriptor(SortDescriptor::ascending(list.clone()))
//! .section_name_key_path(list)
//! .build()
//! .unwrap();
//!
//! let controller = ResultsController::new(config).unwrap();
//! assert!(controller.sections().is_none());
//!
//! controller.perform_fetch().unwrap();
//! assert_eq!(controller.section_index_titles(), vec!["E", "W"]);
//! let report = controller.object_at_index_path(IndexPath::new(1, 0)).unwrap().unwrap();
//! assert_eq!(report.title, "report");
//! ```

use std::{
    fmt,
    sync::{
        Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{
    FetchConfig, KeyPath, Predicate, Result, SortDescriptor,
    config::ConfigurationError,
    record::{IndexPath, Record},
    section::{SectionIndex, SectionInfo, default_index_title},
    store::{ChangeEvent, ChangeListener, LiveStore, SubscriptionId},
};

mod delegate;
pub use delegate::ResultsDelegate;

mod errors;
pub use errors::ControllerError;

mod notifier;
use notifier::CycleGuard;


/// Fetched records and the sections computed from them.
struct Snapshot<T> {
    fetched: Arc<[Record<T>]>,
    index: SectionIndex<T>,
}

struct ControllerInner<T> {
    config: FetchConfig<T>,
    /// `None` until the first successful fetch.
    state: RwLock<Option<Arc<Snapshot<T>>>>,
    delegate: RwLock<Option<Weak<dyn ResultsDelegate<T>>>>,
    subscription: Mutex<Option<SubscriptionId>>,
    cycle: CycleGuard,
    /// Bumped by every fetch; a cycle that started under an older generation
    /// must not publish its results.
    generation: AtomicU64,
}

impl<T> ControllerInner<T> {
    fn read_state(&self) -> RwLockReadGuard<'_, Option<Arc<Snapshot<T>>>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Option<Arc<Snapshot<T>>>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Replaces the state unconditionally and starts a new generation.
    fn install(&self, snapshot: Snapshot<T>) {
        let mut state = self.write_state();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *state = Some(Arc::new(snapshot));
    }

    /// Replaces the state unless a fetch happened since `generation`.
    fn install_if_current(&self, generation: u64, snapshot: Arc<Snapshot<T>>) -> bool {
        let mut state = self.write_state();
        if self.generation() != generation {
            return false;
        }
        *state = Some(snapshot);
        true
    }
}

impl<T> Drop for ControllerInner<T> {
    fn drop(&mut self) {
        let subscription = self
            .subscription
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(subscription) = subscription {
            tracing::debug!(
                "Controller for '{}' dropped; unsubscribing",
                self.config.object_type()
            );
            self.config.store().unsubscribe(subscription);
        }
    }
}

/// Sectioned, live view over the results of one query.
///
/// `ResultsController` is a cheap handle: clones share the same state,
/// subscription and delegate. The store subscription only keeps a weak
/// reference, so dropping the last handle unsubscribes from the store.
///
/// Before [`perform_fetch`](Self::perform_fetch) succeeds the accessors report
/// absent or empty results rather than errors.
pub struct ResultsController<T> {
    inner: Arc<ControllerInner<T>>,
}

impl<T> Clone for ResultsController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + Sync + 'static> ResultsController<T> {
    /// Creates a controller for `config`.
    ///
    /// Nothing is fetched until [`perform_fetch`](Self::perform_fetch).
    ///
    /// # Errors
    /// `ConfigurationError::UnknownObjectType` if the store cannot resolve the
    /// configured object type.
    pub fn new(config: FetchConfig<T>) -> Result<Self> {
        if !config.store().contains_type(config.object_type()) {
            return Err(ConfigurationError::UnknownObjectType {
                object_type: config.object_type().to_string(),
            }
            .into());
        }
        tracing::debug!("Created results controller for '{}'", config.object_type());

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                state: RwLock::new(None),
                delegate: RwLock::new(None),
                subscription: Mutex::new(None),
                cycle: CycleGuard::default(),
                generation: AtomicU64::new(0),
            }),
        })
    }

    /// Runs the query, computes the sections and subscribes to store changes.
    ///
    /// Calling it again re-runs the query, replaces the sections and replaces
    /// the subscription. A change cycle still in flight is abandoned. No
    /// delegate callbacks are made for a fetch.
    ///
    /// # Errors
    /// Store errors are returned as-is; the controller keeps its previous state.
    pub fn perform_fetch(&self) -> Result<()> {
        let config = &self.inner.config;
        let store = config.store();
        let object_type = config.object_type();

        let weak = Arc::downgrade(&self.inner);
        let listener: ChangeListener = Arc::new(move |event: &ChangeEvent| {
            if let Some(inner) = weak.upgrade() {
                notifier::handle_store_change(&inner, event);
            }
        });
        // Subscribe before fetching so no change between the two is lost.
        let subscription = store.subscribe(object_type, listener)?;

        let records = match store.fetch(&config.fetch_request()) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Fetch of '{object_type}' failed: {e}");
                store.unsubscribe(subscription);
                return Err(e);
            }
        };

        let snapshot = self.compute_snapshot(records);
        tracing::debug!(
            "Fetched {} record(s) of '{object_type}' into {} section(s)",
            snapshot.fetched.len(),
            snapshot.index.len()
        );
        self.inner.install(snapshot);

        let previous = self
            .inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(subscription);
        if let Some(previous) = previous {
            store.unsubscribe(previous);
        }
        Ok(())
    }

    fn compute_snapshot(&self, records: Vec<Record<T>>) -> Snapshot<T> {
        let index = SectionIndex::build(&records, self.inner.config.section_grouping(), |name| {
            self.section_index_title_for_section_name(name)
        });
        Snapshot {
            fetched: records.into(),
            index,
        }
    }
}

impl<T> ResultsController<T> {
    fn snapshot(&self) -> Option<Arc<Snapshot<T>>> {
        self.inner.read_state().clone()
    }

    /// Whether a fetch has succeeded.
    pub fn is_fetched(&self) -> bool {
        self.inner.read_state().is_some()
    }

    /// The fetched records in primary sort order; `None` before the first fetch.
    pub fn fetched_objects(&self) -> Option<Vec<Record<T>>> {
        self.snapshot().map(|s| s.fetched.to_vec())
    }

    /// The current sections; `None` before the first fetch.
    pub fn sections(&self) -> Option<Vec<SectionInfo<T>>> {
        self.snapshot().map(|s| s.index.sections().to_vec())
    }

    /// The record at `path`.
    ///
    /// # Errors
    /// `ControllerError::SectionOutOfRange` or `ControllerError::RowOutOfRange`
    /// if `path` lies outside the current sections.
    pub fn object_at_index_path(&self, path: IndexPath) -> Result<Option<Record<T>>> {
        let Some(snapshot) = self.snapshot() else {
            return Ok(None);
        };
        let section = snapshot
            .index
            .section(path.section)
            .ok_or(ControllerError::SectionOutOfRange {
                section: path.section,
                count: snapshot.index.len(),
            })?;
        let record = section
            .object(path.row)
            .ok_or(ControllerError::RowOutOfRange {
                section: path.section,
                row: path.row,
                count: section.number_of_objects(),
            })?;
        Ok(Some(record.clone()))
    }

    /// Where `record` currently sits, by record id; `None` if it is not part of
    /// the results.
    pub fn index_path_for_object(&self, record: &Record<T>) -> Option<IndexPath> {
        self.snapshot()?.index.index_path_of(record.id())
    }

    /// The index title for a section name: the delegate's override if it gives
    /// one, otherwise the first character of `name` uppercased.
    pub fn section_index_title_for_section_name(&self, name: &str) -> String {
        self.delegate()
            .and_then(|d| d.section_index_title_for_section_name(self, name))
            .unwrap_or_else(|| default_index_title(name))
    }

    /// Distinct section index titles in section order; empty before the first fetch.
    ///
    /// Sections whose index title is empty, such as the unnamed section or
    /// the single section of an unsectioned controller, have no entry here.
    pub fn section_index_titles(&self) -> Vec<String> {
        self.snapshot()
            .map(|s| s.index.titles().to_vec())
            .unwrap_or_default()
    }

    /// The first section whose index title is the title at `title_index` in
    /// [`section_index_titles`](Self::section_index_titles).
    ///
    /// # Errors
    /// `ControllerError::TitleIndexOutOfRange` if `title_index` is past the end
    /// of the title list.
    pub fn section_for_section_index_title_at_index(
        &self,
        title_index: usize,
    ) -> Result<Option<usize>> {
        let Some(snapshot) = self.snapshot() else {
            return Ok(None);
        };
        match snapshot.index.section_for_title_index(title_index) {
            Some(section) => Ok(Some(section)),
            None => Err(ControllerError::TitleIndexOutOfRange {
                index: title_index,
                count: snapshot.index.titles().len(),
            }
            .into()),
        }
    }

    pub fn config(&self) -> &FetchConfig<T> {
        &self.inner.config
    }

    pub fn object_type(&self) -> &str {
        self.inner.config.object_type()
    }

    pub fn predicate(&self) -> Option<&Predicate<T>> {
        self.inner.config.predicate()
    }

    pub fn sort_descriptor(&self) -> &SortDescriptor<T> {
        self.inner.config.sort_descriptor()
    }

    pub fn section_sort_descriptor(&self) -> Option<&SortDescriptor<T>> {
        self.inner.config.section_sort_descriptor()
    }

    pub fn section_name_key_path(&self) -> Option<&KeyPath<T>> {
        self.inner.config.section_name_key_path()
    }

    pub fn store(&self) -> &Arc<dyn LiveStore<T>> {
        self.inner.config.store()
    }

    /// Registers `delegate` for change notifications, replacing any previous one.
    ///
    /// Only a weak reference is kept: once the caller drops its last `Arc`
    /// the delegate stops receiving callbacks.
    pub fn set_delegate<D>(&self, delegate: &Arc<D>)
    where
        D: ResultsDelegate<T> + 'static,
    {
        let delegate = Arc::downgrade(delegate);
        let delegate: Weak<dyn ResultsDelegate<T>> = delegate;
        *self
            .inner
            .delegate
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(delegate);
    }

    pub fn clear_delegate(&self) {
        *self
            .inner
            .delegate
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The delegate, if one is set and still alive.
    pub fn delegate(&self) -> Option<Arc<dyn ResultsDelegate<T>>> {
        self.inner
            .delegate
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }
}

impl<T> fmt::Debug for ResultsController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("ResultsController")
            .field("object_type", &self.object_type())
            .field("fetched", &snapshot.as_ref().map(|s| s.fetched.len()))
            .field("sections", &snapshot.as_ref().map(|s| s.index.len()))
            .field("cycle_running", &self.inner.cycle.is_running())
            .finish()
    }
}
