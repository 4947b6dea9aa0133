use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::error::FetchError;

use super::abort::AbortController;

pub(crate) enum Outcome<R> {
    Pending,
    Ready(Arc<R>),
    Failed(FetchError),
}

impl<R> Outcome<R> {
    fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl<R> Clone for Outcome<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Pending => Self::Pending,
            Self::Ready(result) => Self::Ready(Arc::clone(result)),
            Self::Failed(error) => Self::Failed(error.clone()),
        }
    }
}

/// What [`FetchStore::get`](super::FetchStore::get) observed for a key.
#[derive(Debug)]
pub enum FetchState<R> {
    /// Still in flight; await [`PendingFetch::settled`] and call `get` again.
    Pending(PendingFetch<R>),
    Ready(Arc<R>),
    Failed(FetchError),
}

impl<R> FetchState<R> {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The settled result, if any.
    #[must_use]
    pub fn ready(self) -> Option<Arc<R>> {
        match self {
            Self::Ready(result) => Some(result),
            _ => None,
        }
    }
}

/// Handle on an in-flight fetch shared by every caller of the same key.
pub struct PendingFetch<R> {
    outcome: watch::Receiver<Outcome<R>>,
}

impl<R> PendingFetch<R> {
    /// Waits for the fetch to settle and returns its outcome.
    pub async fn settled(mut self) -> Result<Arc<R>, FetchError> {
        let outcome = match self.outcome.wait_for(|outcome| !outcome.is_pending()).await {
            Ok(outcome) => outcome.clone(),
            Err(_) => return Err(FetchError::Interrupted),
        };

        match outcome {
            Outcome::Ready(result) => Ok(result),
            Outcome::Failed(error) => Err(error),
            Outcome::Pending => Err(FetchError::Interrupted),
        }
    }
}

impl<R> fmt::Debug for PendingFetch<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingFetch").finish_non_exhaustive()
    }
}

/// One fetch attempt and its settled outcome.
pub(crate) struct Instance<R> {
    outcome: watch::Receiver<Outcome<R>>,
    // Preset instances never ran a fetch and cannot be aborted.
    controller: Option<AbortController>,
}

impl<R: Send + Sync + 'static> Instance<R> {
    /// Runs `future` on `runtime`.
    ///
    /// The fetch runs in its own task so a panic settles the instance as
    /// [`FetchError::TaskPanicked`] instead of leaving it pending forever.
    /// `on_settle` runs once, right before the outcome is published.
    pub(crate) fn spawn<F>(
        runtime: &Handle,
        future: BoxFuture<'static, Result<R, FetchError>>,
        controller: AbortController,
        on_settle: F,
    ) -> Self
    where
        F: FnOnce(Result<&R, &FetchError>) + Send + 'static,
    {
        let (sender, outcome) = watch::channel(Outcome::Pending);
        let task = runtime.spawn(future);

        runtime.spawn(async move {
            let settled = match task.await {
                Ok(Ok(result)) => Outcome::Ready(Arc::new(result)),
                Ok(Err(error)) => Outcome::Failed(error),
                Err(join_error) => Outcome::Failed(FetchError::TaskPanicked(join_error.to_string())),
            };
            match &settled {
                Outcome::Ready(result) => on_settle(Ok(result.as_ref())),
                Outcome::Failed(error) => on_settle(Err(error)),
                Outcome::Pending => {}
            }
            sender.send_replace(settled);
        });

        Self {
            outcome,
            controller: Some(controller),
        }
    }

    pub(crate) fn resolved(result: R) -> Self {
        Self::settled(Outcome::Ready(Arc::new(result)))
    }

    /// An instance that failed before its fetch could be spawned.
    pub(crate) fn failed(error: FetchError) -> Self {
        Self::settled(Outcome::Failed(error))
    }

    fn settled(outcome: Outcome<R>) -> Self {
        let (_, outcome) = watch::channel(outcome);
        Self {
            outcome,
            controller: None,
        }
    }
}

impl<R> Instance<R> {
    pub(crate) fn state(&self) -> FetchState<R> {
        let outcome = self.outcome.borrow().clone();
        match outcome {
            Outcome::Pending => FetchState::Pending(PendingFetch {
                outcome: self.outcome.clone(),
            }),
            Outcome::Ready(result) => FetchState::Ready(result),
            Outcome::Failed(error) => FetchState::Failed(error),
        }
    }

    pub(crate) fn is_failed(&self) -> bool {
        matches!(*self.outcome.borrow(), Outcome::Failed(_))
    }

    /// Requests cancellation; returns whether a pending fetch was signalled.
    pub(crate) fn abort(&self, reason: Option<&str>) -> bool {
        if !self.outcome.borrow().is_pending() {
            return false;
        }
        self.controller
            .as_ref()
            .is_some_and(|controller| controller.abort(reason))
    }
}
