use thiserror::Error;
use tokio::sync::watch;

/// Rejection produced when a fetch observes cancellation.
///
/// Carries the optional diagnostic reason passed to
/// [`AbortController::abort`], so a consumer can render cancellation
/// differently from a genuine failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("AbortError: {}", .reason.as_deref().unwrap_or("aborted"))]
pub struct AbortError {
    reason: Option<String>,
}

impl AbortError {
    #[must_use]
    pub fn new(reason: Option<&str>) -> Self {
        Self {
            reason: reason.map(str::to_owned),
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Owner side of a cooperative cancellation token.
#[derive(Debug)]
pub struct AbortController {
    sender: watch::Sender<Option<AbortError>>,
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortController {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            receiver: self.sender.subscribe(),
        }
    }

    /// Requests cancellation. Only the first call takes effect; returns
    /// whether this call did.
    pub fn abort(&self, reason: Option<&str>) -> bool {
        self.sender.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(AbortError::new(reason));
            true
        })
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.sender.borrow().is_some()
    }
}

/// Observer side of a cancellation token, handed to fetch functions.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    receiver: watch::Receiver<Option<AbortError>>,
}

impl AbortSignal {
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.receiver.borrow().is_some()
    }

    #[must_use]
    pub fn reason(&self) -> Option<AbortError> {
        self.receiver.borrow().clone()
    }

    /// Returns the abort error once cancellation has been requested.
    pub fn check(&self) -> Result<(), AbortError> {
        match self.reason() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Resolves when cancellation is requested.
    ///
    /// Never resolves if the controller is dropped without aborting, so it
    /// can be raced against the actual work in a `select!`.
    pub async fn aborted(&self) -> AbortError {
        let mut receiver = self.receiver.clone();
        if let Ok(current) = receiver.wait_for(Option::is_some).await {
            if let Some(error) = current.clone() {
                return error;
            }
        }
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::{AbortController, AbortError};

    #[test]
    fn only_first_abort_takes_effect() {
        let controller = AbortController::new();
        let signal = controller.signal();
        assert!(!signal.is_aborted());

        assert!(controller.abort(Some("first")));
        assert!(!controller.abort(Some("second")));

        assert!(controller.is_aborted());
        assert_eq!(signal.reason(), Some(AbortError::new(Some("first"))));
        assert_eq!(signal.check(), Err(AbortError::new(Some("first"))));
    }

    #[test]
    fn abort_error_display_includes_reason() {
        assert_eq!(
            AbortError::new(Some("user navigated away")).to_string(),
            "AbortError: user navigated away"
        );
        assert_eq!(AbortError::new(None).to_string(), "AbortError: aborted");
    }

    #[tokio::test]
    async fn aborted_resolves_for_signals_created_before_abort() {
        let controller = AbortController::new();
        let signal = controller.signal();

        let waiter = tokio::spawn(async move { signal.aborted().await });
        controller.abort(Some("stop"));

        let error = waiter.await.expect("waiter task");
        assert_eq!(error.reason(), Some("stop"));
    }
}
