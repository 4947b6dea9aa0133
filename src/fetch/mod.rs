//! Keyed fetch store: deduplicated, cancellable, presettable asynchronous
//! fetches for data providers.

pub mod abort;
pub mod instance;
pub mod keyed;
pub mod progress;
pub mod store;

pub use abort::{AbortController, AbortError, AbortSignal};
pub use instance::{FetchState, PendingFetch};
pub use keyed::{AreEqual, KeyedEntries};
pub use progress::{ProgressReporter, ProgressTracker};
pub use store::{FetchFn, FetchFuture, FetchStore};

pub use crate::error::FetchError;
