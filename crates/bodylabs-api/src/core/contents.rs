use crate::error::Error;

/// Classify a failed contents fetch for an asynchronously processed
/// resource: 404 means still processing, 410 means processing failed.
/// Every other failure passes through.
pub fn map_contents_error(err: bodylabs_transport::Error, resource: &str) -> Error {
    match err.status() {
        Some(404) => Error::Processing(resource.to_string()),
        Some(410) => Error::ProcessingFailed(resource.to_string()),
        _ => Error::Transport(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn http(actual: u16) -> bodylabs_transport::Error {
        bodylabs_transport::Error::Http {
            expected: 200,
            actual,
            body: json!({}),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(map_contents_error(http(404), "<Artifact a>"), Error::Processing(r) if r == "<Artifact a>"));
        assert!(matches!(map_contents_error(http(410), "<Artifact a>"), Error::ProcessingFailed(_)));
        assert!(matches!(map_contents_error(http(500), "<Artifact a>"), Error::Transport(_)));
        assert!(matches!(
            map_contents_error(bodylabs_transport::Error::Network("reset".into()), "<Artifact a>"),
            Error::Transport(_)
        ));
    }
}
