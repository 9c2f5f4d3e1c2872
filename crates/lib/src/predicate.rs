//! Filter predicates.

use std::{fmt, sync::Arc};

/// A shareable filter over objects of type `T`.
pub struct Predicate<T> {
    test: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Predicate<T> {
    pub fn new(test: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            test: Arc::new(test),
        }
    }

    pub fn evaluate(&self, object: &T) -> bool {
        (self.test)(object)
    }
}

impl<T: 'static> Predicate<T> {
    /// Matches objects accepted by both predicates.
    pub fn and(self, other: Predicate<T>) -> Self {
        Self::new(move |object| self.evaluate(object) && other.evaluate(object))
    }

    /// Matches objects accepted by either predicate.
    pub fn or(self, other: Predicate<T>) -> Self {
        Self::new(move |object| self.evaluate(object) || other.evaluate(object))
    }

    /// Matches objects rejected by this predicate.
    pub fn negate(self) -> Self {
        Self::new(move |object| !self.evaluate(object))
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            test: Arc::clone(&self.test),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}
