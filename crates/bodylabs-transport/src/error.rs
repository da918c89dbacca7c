//! Error types for bodylabs-transport.

use std::io;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with a status other than the one the call expects.
    ///
    /// `body` is the parsed JSON error document, or an empty object when the
    /// body could not be parsed.
    #[error("expected status code {expected}; got {actual}. {body}")]
    Http {
        expected: u16,
        actual:   u16,
        body:     Value,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot derive an upload filename from {0}")]
    InvalidPath(PathBuf),

    /// Object storage accepted the PUT but did not report a version id.
    ///
    /// This means versioning is not enabled on the bucket and is not retryable.
    #[error("storage backend returned no x-amz-version-id header; is versioning enabled on the bucket?")]
    MissingVersionId,

    #[error("expected a redirect, got status {0}")]
    NotRedirect(u16),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// The HTTP status of an [`Error::Http`], if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { actual, .. } => Some(*actual),
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
    fn test_http_error_message_names_both_statuses() {
        let err = Error::Http {
            expected: 202,
            actual:   404,
            body:     json!({"code": "NOT_FOUND_RESOURCE"}),
        };

        let message = err.to_string();
        assert!(message.starts_with("expected status code 202; got 404."));
        assert!(message.contains("NOT_FOUND_RESOURCE"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_status_is_none_for_non_http_errors() {
        assert_eq!(Error::Network("reset".into()).status(), None);
        assert_eq!(Error::MissingVersionId.status(), None);
    }
}
