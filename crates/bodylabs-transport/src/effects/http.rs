use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use serde_json::{Map, Value};

use crate::error::Result;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Streaming body of an [`HttpResponse`].
pub type ResponseBody = BoxStream<'static, Result<Bytes>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A fully resolved request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method:           Method,
    pub url:              String,
    pub headers:          Vec<(String, String)>,
    pub body:             Option<Bytes>,
    pub follow_redirects: bool,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            follow_redirects: true,
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn no_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// First header with the given name, compared case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Status, headers and a streaming body.
pub struct HttpResponse {
    pub status:  u16,
    pub headers: Vec<(String, String)>,
    pub body:    ResponseBody,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl HttpResponse {
    /// First header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> { find_header(&self.headers, name) }

    /// Collect the whole body.
    pub async fn bytes(self) -> Result<Bytes> {
        let mut body = self.body;
        let mut buf = BytesMut::new();
        while let Some(chunk) = body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Decode the body as JSON. An empty body decodes to `null`.
    pub async fn json(self) -> Result<Value> {
        let bytes = self.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Best-effort decode of an error body: anything unreadable becomes `{}`.
    pub async fn error_body(self) -> Value {
        match self.bytes().await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new())),
            Err(_) => Value::Object(Map::new()),
        }
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Asynchronous HTTP transport abstraction.
///
/// Implementations only move bytes: they do not check status codes and do
/// not add authentication. Redirects are followed unless the request sets
/// `follow_redirects` to false.
///
/// # Implementations
///
/// - [`ReqwestTransport`]: Production implementation using `reqwest`
/// - [`MockTransport`](super::MockTransport): scripted responses for tests
pub trait Transport: Send + Sync {
    /// Send a request and return the response with its body still streaming.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`](crate::Error::Network) if no response was
    /// received (DNS failure, connection reset, transport timeout).
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use super::*;
    use crate::error::Error;

    /// Production transport backed by `reqwest`.
    ///
    /// Holds two connection pools: one follows redirects, the other hands
    /// 3xx responses back to the caller.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client:      reqwest::Client,
        no_redirect: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(timeout: Option<Duration>) -> Result<Self> {
            let mut follow = reqwest::Client::builder();
            let mut manual = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
            if let Some(timeout) = timeout {
                follow = follow.timeout(timeout);
                manual = manual.timeout(timeout);
            }

            Ok(Self {
                client:      follow.build().map_err(|e| Error::Config(e.to_string()))?,
                no_redirect: manual.build().map_err(|e| Error::Config(e.to_string()))?,
            })
        }
    }

    impl Transport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            let client = if request.follow_redirects {
                &self.client
            } else {
                &self.no_redirect
            };
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Patch => reqwest::Method::PATCH,
                Method::Put => reqwest::Method::PUT,
            };

            let mut builder = client.request(method, &request.url);
            for (key, value) in &request.headers {
                builder = builder.header(key, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| Error::Network(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(key, value)| {
                    value.to_str().ok().map(|v| (key.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| Error::Network(e.to_string())));

            Ok(HttpResponse {
                status,
                headers,
                body: Box::pin(body),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestTransport;
