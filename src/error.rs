use std::sync::Arc;

use thiserror::Error;

use crate::fetch::AbortError;

pub type VisResult<T> = Result<T, VisError>;

#[derive(Debug, Error)]
pub enum VisError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid format specifier: {0}")]
    InvalidFormatSpecifier(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Settled failure of a fetch. Cloned to every caller waiting on the same key.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error(transparent)]
    Aborted(#[from] AbortError),

    #[error("fetch failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Source(Arc<dyn std::error::Error + Send + Sync>),

    #[error("fetch task panicked: {0}")]
    TaskPanicked(String),

    #[error("fetch task ended before settling")]
    Interrupted,

    #[error("no Tokio runtime to run the fetch on")]
    NoRuntime,
}

impl FetchError {
    /// Wraps a provider error. `Display` and `source()` forward to the wrapped
    /// error; match on [`FetchError::Source`] to downcast it.
    pub fn from_source<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Source(Arc::new(error))
    }

    #[must_use]
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }

    #[must_use]
    pub fn abort_reason(&self) -> Option<&str> {
        match self {
            Self::Aborted(error) => error.reason(),
            _ => None,
        }
    }
}
