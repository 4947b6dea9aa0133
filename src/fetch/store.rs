use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tracing::{debug, trace};

use crate::error::FetchError;

use super::abort::{AbortController, AbortSignal};
use super::instance::{FetchState, Instance};
use super::keyed::{AreEqual, KeyedEntries};
use super::progress::{ProgressReporter, ProgressTracker};

pub type FetchFuture<R> = BoxFuture<'static, Result<R, FetchError>>;

/// Type-erased fetch function: input, cancellation signal, progress handle.
pub type FetchFn<I, R> =
    Arc<dyn Fn(I, AbortSignal, ProgressReporter<I>) -> FetchFuture<R> + Send + Sync + 'static>;

/// Keyed cache that runs at most one fetch per logically-equal input.
///
/// `get` never blocks: it returns [`FetchState::Pending`] while the fetch is in
/// flight, and the caller awaits [`PendingFetch::settled`](super::PendingFetch::settled)
/// before asking again. Failures are stored like results and only surface
/// when a caller reads the key. Nothing is retried automatically; evict the
/// key and `get` it again to retry.
///
/// Fetches run on the ambient Tokio runtime. Called outside one, `prefetch`
/// and `get` store the key as failed with [`FetchError::NoRuntime`]. The
/// fetch function is invoked while the cache is locked and must not call
/// back into the store before returning its future; if it panics instead,
/// the key fails with [`FetchError::TaskPanicked`].
///
/// ```rust
/// use h5vis::fetch::{FetchState, FetchStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = FetchStore::new(|path: String, _signal, _progress| async move { Ok(path.len()) });
///
/// let path = "/entry/data".to_owned();
/// assert!(store.get(&path).is_pending());
/// assert_eq!(*store.fetch(&path).await.expect("fetched"), 11);
/// assert!(matches!(store.get(&path), FetchState::Ready(_)));
/// # }
/// ```
pub struct FetchStore<I, R> {
    fetch: FetchFn<I, R>,
    cache: Mutex<KeyedEntries<I, Instance<R>>>,
    progress: Arc<ProgressTracker<I>>,
}

impl<I, R> FetchStore<I, R>
where
    I: Clone + fmt::Debug + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    /// Creates a store whose keys compare with `PartialEq`.
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        I: PartialEq,
        F: Fn(I, AbortSignal, ProgressReporter<I>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, FetchError>> + Send + 'static,
    {
        Self::with_equality(fetch, |a: &I, b: &I| a == b)
    }

    /// Creates a store whose keys compare with `are_equal`.
    pub fn with_equality<F, Fut, E>(fetch: F, are_equal: E) -> Self
    where
        F: Fn(I, AbortSignal, ProgressReporter<I>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, FetchError>> + Send + 'static,
        E: Fn(&I, &I) -> bool + Send + Sync + 'static,
    {
        let are_equal: AreEqual<I> = Arc::new(are_equal);
        Self {
            fetch: Arc::new(
                move |input: I, signal: AbortSignal, progress: ProgressReporter<I>| {
                    fetch(input, signal, progress).boxed()
                },
            ),
            cache: Mutex::new(KeyedEntries::new(Arc::clone(&are_equal))),
            progress: Arc::new(ProgressTracker::new(are_equal)),
        }
    }

    fn entries(&self) -> MutexGuard<'_, KeyedEntries<I, Instance<R>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn has(&self, input: &I) -> bool {
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

    /// Starts fetching `input` unless an entry already exists for it.
    pub fn prefetch(&self, input: &I) {
        let mut entries = self.entries();
        if !entries.contains(input) {
            entries.insert(input.clone(), self.start(input));
        }
    }

    /// Current state of `input`, starting its fetch on a miss.
    pub fn get(&self, input: &I) -> FetchState<R> {
        let mut entries = self.entries();
        if let Some(instance) = entries.get(input) {
            return instance.state();
        }

        let instance = self.start(input);
        let state = instance.state();
        entries.insert(input.clone(), instance);
        state
    }

    /// Resolves once `input` has settled.
    ///
    /// Callers racing on the same key share one fetch and receive the same
    /// `Arc`.
    pub async fn fetch(&self, input: &I) -> Result<Arc<R>, FetchError> {
        match self.get(input) {
            FetchState::Pending(pending) => pending.settled().await,
            FetchState::Ready(result) => Ok(result),
            FetchState::Failed(error) => Err(error),
        }
    }

    /// Stores an already-known result for `input` without running the fetch.
    ///
    /// A pending fetch it replaces is orphaned, not aborted.
    pub fn preset(&self, input: I, result: R) {
        debug!(?input, "preset fetch result");
        self.entries().insert(input, Instance::resolved(result));
    }

    /// Drops the entry for `input`. A pending fetch keeps running but its
    /// outcome is discarded.
    pub fn evict(&self, input: &I) {
        if self.entries().remove(input).is_some() {
            debug!(?input, "evicted fetch entry");
        }
    }

    /// Drops every failed entry and returns how many were removed.
    pub fn evict_errors(&self) -> usize {
        let removed = self.entries().retain(|_, instance| !instance.is_failed());
        debug!(removed, "evicted failed fetch entries");
        removed
    }

    /// Signals cancellation to the fetch of `input`. The entry stays cached
    /// and fails once the fetch function observes the signal.
    pub fn abort(&self, input: &I, reason: Option<&str>) {
        self.abort_with(input, reason, false);
    }

    /// Like [`abort`](Self::abort), also evicting the entry when `evict` is set.
    pub fn abort_with(&self, input: &I, reason: Option<&str>, evict: bool) {
        let mut entries = self.entries();
        let signalled = entries
            .get(input)
            .is_some_and(|instance| instance.abort(reason));
        if signalled {
            debug!(?input, reason, "aborted fetch");
        }
        if evict {
            entries.remove(input);
        }
    }

    pub fn abort_all(&self, reason: Option<&str>) {
        self.abort_all_with(reason, false);
    }

    /// Signals cancellation to every fetch, optionally clearing the cache.
    pub fn abort_all_with(&self, reason: Option<&str>, evict: bool) {
        let mut entries = self.entries();
        let signalled = entries
            .iter()
            .filter(|(_, instance)| instance.abort(reason))
            .count();
        debug!(signalled, reason, evict, "aborted all fetches");
        if evict {
            entries.clear();
        }
    }

    /// Progress of the fetches in flight.
    #[must_use]
    pub fn progress(&self) -> &Arc<ProgressTracker<I>> {
        &self.progress
    }

    fn start(&self, input: &I) -> Instance<R> {
        let Ok(runtime) = Handle::try_current() else {
            debug!(?input, "fetch not started outside a Tokio runtime");
            return Instance::failed(FetchError::NoRuntime);
        };

        let controller = AbortController::new();
        self.progress.start(input.clone());
        let reporter = ProgressReporter::new(Arc::clone(&self.progress), input.clone());
        let called = panic::catch_unwind(AssertUnwindSafe(|| {
            (self.fetch)(input.clone(), controller.signal(), reporter)
        }));
        let future = match called {
            Ok(future) => future,
            Err(payload) => {
                self.progress.finish(input);
                let error = FetchError::TaskPanicked(panic_message(payload.as_ref()));
                debug!(?input, %error, "fetch failed");
                return Instance::failed(error);
            }
        };
        debug!(?input, "fetch started");

        let progress = Arc::clone(&self.progress);
        let input = input.clone();
        Instance::spawn(&runtime, future, controller, move |outcome| {
            progress.finish(&input);
            match outcome {
                Ok(_) => {
                    debug!(?input, "fetch settled");
                }
                Err(error) if error.is_abort() => {
                    debug!(?input, reason = error.abort_reason(), "fetch aborted");
                }
                Err(error) => {
                    debug!(?input, %error, "fetch failed");
                }
            }
            trace!(?input, ongoing = progress.len(), "fetch progress cleared");
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "fetch function panicked".to_owned()
    }
}

impl<I: fmt::Debug, R> fmt::Debug for FetchStore<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("FetchStore")
            .field("entries", &*entries)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}
