use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream;
use serde_json::Value;

use super::client::DOWNLOAD_CHUNK_SIZE;
use super::http::{HttpRequest, HttpResponse, Transport};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct Scripted {
    status:  u16,
    headers: Vec<(String, String)>,
    body:    Bytes,
    delay:   Option<Duration>,
    /// Fail the body stream after its first chunk.
    broken:  bool,
}

/// Transport that replays scripted responses in order and records every
/// request it receives.
///
/// Bodies are streamed back in [`DOWNLOAD_CHUNK_SIZE`] pieces. Once the
/// script runs out every request fails with [`Error::Network`].
///
/// ```
/// use bodylabs_transport::MockTransport;
/// use serde_json::json;
///
/// let transport = MockTransport::new();
/// transport
///     .push_json(200, json!({"accountId": "me"}))
///     .push_bytes(401, "");
/// assert_eq!(transport.remaining(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    script:   Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    pub fn new() -> Self { Self::default() }

    fn push(&self, scripted: Scripted) -> &Self {
        lock(&self.script).push_back(scripted);
        self
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push(Scripted {
            status,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: Bytes::from(body.to_string()),
            delay: None,
            broken: false,
        })
    }

    /// Queue a raw response body.
    pub fn push_bytes(&self, status: u16, body: impl Into<Bytes>) -> &Self {
        self.push(Scripted {
            status,
            headers: Vec::new(),
            body: body.into(),
            delay: None,
            broken: false,
        })
    }

    /// Queue a response with explicit headers.
    pub fn push_with_headers(
        &self,
        status: u16,
        headers: &[(&str, &str)],
        body: impl Into<Bytes>,
    ) -> &Self {
        self.push(Scripted {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            body: body.into(),
            delay: None,
            broken: false,
        })
    }

    /// Queue a JSON response that only arrives after `delay`.
    pub fn push_delayed(&self, delay: Duration, status: u16, body: Value) -> &Self {
        self.push(Scripted {
            status,
            headers: Vec::new(),
            body: Bytes::from(body.to_string()),
            delay: Some(delay),
            broken: false,
        })
    }

    /// Queue a response whose body stream fails after the first chunk.
    pub fn push_interrupted(&self, status: u16, body: impl Into<Bytes>) -> &Self {
        self.push(Scripted {
            status,
            headers: Vec::new(),
            body: body.into(),
            delay: None,
            broken: true,
        })
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> { lock(&self.requests).clone() }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize { lock(&self.script).len() }
}

impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request.url.clone();
        lock(&self.requests).push(request);
        let next = lock(&self.script).pop_front();

        let Some(scripted) = next else {
            return Err(Error::Network(format!("no scripted response for {url}")));
        };
        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }

        let body = scripted.body;
        let mut chunks: Vec<Result<Bytes>> = (0..body.len())
            .step_by(DOWNLOAD_CHUNK_SIZE)
            .map(|start| Ok(body.slice(start..(start + DOWNLOAD_CHUNK_SIZE).min(body.len()))))
            .collect();
        if scripted.broken {
            chunks.truncate(1);
            chunks.push(Err(Error::Network(format!("connection reset reading {url}"))));
        }

        Ok(HttpResponse {
            status:  scripted.status,
            headers: scripted.headers,
            body:    Box::pin(stream::iter(chunks)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"n": 1})).push_bytes(404, "");

        let first = mock
            .send(HttpRequest::new(Method::Get, "http://api.test/a"))
            .await
            .unwrap();
        assert_eq!(first.status, 200);
        assert_eq!(first.json().await.unwrap(), json!({"n": 1}));

        let second = mock
            .send(HttpRequest::new(Method::Get, "http://api.test/b"))
            .await
            .unwrap();
        assert_eq!(second.status, 404);

        let urls: Vec<_> = mock.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, ["http://api.test/a", "http://api.test/b"]);
        assert_eq!(mock.remaining(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_script_is_network_error() {
        let mock = MockTransport::new();
        let err = mock
            .send(HttpRequest::new(Method::Get, "http://api.test/x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_large_body_is_chunked() {
        let mock = MockTransport::new();
        mock.push_bytes(200, vec![7u8; DOWNLOAD_CHUNK_SIZE * 2 + 10]);

        let response = mock
            .send(HttpRequest::new(Method::Get, "http://api.test/x"))
            .await
            .unwrap();
        let bytes = response.bytes().await.unwrap();
        assert_eq!(bytes.len(), DOWNLOAD_CHUNK_SIZE * 2 + 10);
    }
}
