use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use super::keyed::{AreEqual, KeyedEntries};

/// Progress of the fetches currently in flight.
///
/// An input is listed from the moment its fetch starts until it settles.
/// Its value stays `None` until the fetch function reports something.
/// Every change bumps a generation counter that observers can `subscribe` to.
pub struct ProgressTracker<I> {
    ongoing: Mutex<KeyedEntries<I, Option<f64>>>,
    generation: watch::Sender<u64>,
}

impl<I> ProgressTracker<I> {
    pub(crate) fn new(are_equal: AreEqual<I>) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            ongoing: Mutex::new(KeyedEntries::new(are_equal)),
            generation,
        }
    }

    fn entries(&self) -> MutexGuard<'_, KeyedEntries<I, Option<f64>>> {
        self.ongoing.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.generation.send_modify(|generation| *generation += 1);
    }

    pub(crate) fn start(&self, input: I) {
        self.entries().insert(input, None);
        self.bump();
    }

    /// Late reports from a settled fetch are dropped.
    pub(crate) fn set(&self, input: I, value: f64) {
        {
            let mut entries = self.entries();
            if !entries.contains(&input) {
                return;
            }
            entries.insert(input, Some(value));
        }
        self.bump();
    }

    pub(crate) fn finish(&self, input: &I) {
        let removed = self.entries().remove(input).is_some();
        if removed {
            self.bump();
        }
    }

    /// `None` when `input` has no fetch in flight, `Some(None)` before the
    /// first report.
    #[must_use]
    pub fn get(&self, input: &I) -> Option<Option<f64>> {
        self.entries().get(input).copied()
    }

    #[must_use]
    pub fn is_ongoing(&self, input: &I) -> bool {
        self.entries().contains(input)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Receiver that changes whenever an entry is added, updated or removed.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}

impl<I: Clone> ProgressTracker<I> {
    #[must_use]
    pub fn snapshot(&self) -> Vec<(I, Option<f64>)> {
        self.entries()
            .iter()
            .map(|(input, value)| (input.clone(), *value))
            .collect()
    }
}

impl<I: fmt::Debug> fmt::Debug for ProgressTracker<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("ongoing", &*self.entries())
            .field("generation", &*self.generation.borrow())
            .finish()
    }
}

/// Handle given to a fetch function to publish its own progress.
pub struct ProgressReporter<I> {
    tracker: Arc<ProgressTracker<I>>,
    input: I,
}

impl<I: Clone> ProgressReporter<I> {
    pub(crate) fn new(tracker: Arc<ProgressTracker<I>>, input: I) -> Self {
        Self { tracker, input }
    }

    /// Records `value`, usually a fraction in `[0, 1]`.
    pub fn report(&self, value: f64) {
        self.tracker.set(self.input.clone(), value);
    }
}

impl<I: fmt::Debug> fmt::Debug for ProgressReporter<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

impl<I: Clone> Clone for ProgressReporter<I> {
    fn clone(&self) -> Self {
        Self {
            tracker: Arc::clone(&self.tracker),
            input: self.input.clone(),
        }
    }
}
