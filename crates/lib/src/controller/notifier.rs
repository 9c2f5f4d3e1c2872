//! Change notification cycles.
//!
//! Every store change runs a cycle: refetch, recompute sections, diff against
//! the previous sections and report the differences to the delegate. Cycles
//! never overlap. A change that arrives while a cycle is running (from another
//! thread, or from a delegate writing to the store inside a callback) only marks
//! the guard as pending; however many such changes arrive, the running cycle is
//! followed by exactly one more.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ControllerInner, ResultsController};
use crate::{
    section::{SectionChangeType, diff_sections},
    store::ChangeEvent,
};

#[derive(Debug, Default)]
struct CycleState {
    running: bool,
    pending: bool,
}

/// Single-flight guard with trailing-change coalescing.
#[derive(Debug, Default)]
pub(super) struct CycleGuard {
    state: Mutex<CycleState>,
}

impl CycleGuard {
    fn lock(&self) -> MutexGuard<'_, CycleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims the guard. Returns false, and records a pending change, if a
    /// cycle is already running.
    pub(super) fn try_begin(&self) -> bool {
        let mut state = self.lock();
        if state.running {
            state.pending = true;
            return false;
        }
        state.running = true;
        state.pending = false;
        true
    }

    /// Ends a cycle. Returns true if changes arrived meanwhile, in which case
    /// the guard stays claimed and the caller must run one more cycle.
    pub(super) fn finish(&self) -> bool {
        let mut state = self.lock();
        if state.pending {
            state.pending = false;
            return true;
        }
        state.running = false;
        false
    }

    fn reset(&self) {
        *self.lock() = CycleState::default();
    }

    pub(super) fn is_running(&self) -> bool {
        self.lock().running
    }
}

/// Releases the guard if a delegate callback panics mid-cycle.
struct RunningCycle<'a>(&'a CycleGuard);

impl Drop for RunningCycle<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.reset();
        }
    }
}

/// Store listener body: runs cycles until no change is pending.
pub(super) fn handle_store_change<T>(inner: &Arc<ControllerInner<T>>, event: &ChangeEvent)
where
    T: Send + Sync + 'static,
{
    if !inner.cycle.try_begin() {
        tracing::trace!(
            "Change to '{}' arrived during a running cycle; coalescing",
            event.object_type()
        );
        return;
    }

    let _running = RunningCycle(&inner.cycle);
    let controller = ResultsController {
        inner: Arc::clone(inner),
    };
    loop {
        run_cycle(&controller);
        if !inner.cycle.finish() {
            break;
        }
        tracing::debug!(
            "Running follow-up cycle for coalesced changes to '{}'",
            event.object_type()
        );
    }
}

fn run_cycle<T>(controller: &ResultsController<T>)
where
    T: Send + Sync + 'static,
{
    let inner = &controller.inner;
    let object_type = inner.config.object_type();
    let generation = inner.generation();

    let Some(previous) = controller.snapshot() else {
        tracing::trace!("Ignoring change to '{object_type}' before the first fetch");
        return;
    };

    let records = match inner.config.store().fetch(&inner.config.fetch_request()) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Refreshing '{object_type}' failed, keeping previous results: {e}");
            return;
        }
    };
    let next = Arc::new(controller.compute_snapshot(records));

    if next.index.same_shape(&previous.index) {
        if inner.install_if_current(generation, next) {
            tracing::trace!("Sections of '{object_type}' unchanged; no notifications");
        }
        return;
    }

    let changes = diff_sections(previous.index.sections(), next.index.sections());
    let delegate = controller.delegate();

    if let Some(delegate) = &delegate {
        delegate.will_change_content(controller);
    }

    if !inner.install_if_current(generation, Arc::clone(&next)) {
        tracing::debug!("Change cycle for '{object_type}' superseded by a fetch");
        if let Some(delegate) = &delegate {
            delegate.did_change_content(controller);
        }
        return;
    }

    tracing::debug!(
        "Dispatching {} section change(s) for '{object_type}'",
        changes.len()
    );

    let Some(delegate) = delegate else {
        return;
    };
    for change in &changes {
        if inner.generation() != generation {
            tracing::debug!("Change cycle for '{object_type}' superseded by a fetch");
            break;
        }
        let section = match change.change_type {
            SectionChangeType::Delete => previous.index.section(change.index),
            SectionChangeType::Insert | SectionChangeType::CountChange => {
                next.index.section(change.index)
            }
        };
        if let Some(section) = section {
            delegate.did_change_section(controller, section, change.index, change.change_type);
        }
    }
    delegate.did_change_content(controller);
}
