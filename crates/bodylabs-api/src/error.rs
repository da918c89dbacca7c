//! Error types for bodylabs-api.

use thiserror::Error;

use crate::core::TimeoutError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] bodylabs_transport::Error),

    /// Contents are not available yet. Polling again may succeed.
    #[error("{0} is still processing")]
    Processing(String),

    /// Processing failed permanently.
    #[error("{0} failed")]
    ProcessingFailed(String),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    /// An operation was called on a resource in the wrong state, such as
    /// finalizing a file that was never uploaded.
    #[error("{0}")]
    Precondition(String),

    #[error("{0} has no id; create or fetch it first")]
    MissingId(&'static str),

    #[error("invalid {kind} payload from server: {source}")]
    Decode {
        kind:   &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Whether waiting and trying the same call again can succeed.
    pub fn is_retryable(&self) -> bool { matches!(self, Error::Processing(_)) }

    /// HTTP status of an unexpected-status transport error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_processing_is_retryable() {
        assert!(Error::Processing("<Artifact a1>".into()).is_retryable());
        assert!(!Error::ProcessingFailed("<Artifact a1>".into()).is_retryable());
        assert!(!Error::Precondition("no".into()).is_retryable());
    }

    #[test]
    fn test_status_passes_through_transport() {
        let err: Error = bodylabs_transport::Error::Http {
            expected: 200,
            actual:   503,
            body:     json!({}),
        }
        .into();
        assert_eq!(err.status(), Some(503));
        assert_eq!(Error::MissingId("Artifact").status(), None);
    }
}
