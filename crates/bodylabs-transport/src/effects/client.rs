use std::fmt;
use std::path::Path;

use bytes::Bytes;
use futures_util::StreamExt;
use serde_json::{Value, json};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use super::http::{HttpRequest, HttpResponse, Method, ResponseBody, Transport};
use crate::core::{API_VERSION_HEADER, authorization_header, file_name, is_redirect, join_url};
use crate::data::{Call, ClientConfig, DirectUpload, UploadOptions, UploadUri};
use crate::error::{Error, Result};

/// Size of the write buffer used when streaming a response to disk.
pub const DOWNLOAD_CHUNK_SIZE: usize = 1024;

/// Response header carrying the object version assigned by storage.
pub const STORAGE_VERSION_HEADER: &str = "x-amz-version-id";

async fn write_body(mut body: ResponseBody, file: tokio::fs::File) -> Result<u64> {
    let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
    let mut written = 0u64;
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}

/// Authenticated verb wrappers over a [`Transport`].
///
/// Credentials and the base URI are fixed at construction and may be shared
/// by any number of resources through `&Client`.
pub struct Client<T> {
    config:        ClientConfig,
    authorization: String,
    transport:     T,
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "reqwest")]
impl Client<super::http::ReqwestTransport> {
    /// Create a client backed by `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = super::http::ReqwestTransport::new(config.timeout())?;
        Self::with_transport(config, transport)
    }
}

macro_rules! log_call {
    ($client:expr, $call:expr, $($arg:tt)+) => {
        if $call.verbose && $client.config.verbose {
            info!($($arg)+);
        } else {
            debug!($($arg)+);
        }
    };
}

impl<T: Transport> Client<T> {
    /// Create a client over any transport. The configuration is validated.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let authorization = authorization_header(config.auth, &config.access_key, &config.secret);
        Ok(Self {
            config,
            authorization,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig { &self.config }

    pub fn is_verbose(&self) -> bool { self.config.verbose }

    pub fn transport(&self) -> &T { &self.transport }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String { join_url(&self.config.base_uri, path) }

    fn authorized(&self, method: Method, path: &str) -> HttpRequest {
        HttpRequest::new(method, self.url(path))
            .header("Authorization", self.authorization.as_str())
            .header(API_VERSION_HEADER, self.config.api_version.as_str())
    }

    async fn expect(&self, response: HttpResponse, expected: u16) -> Result<HttpResponse> {
        if response.status == expected {
            return Ok(response);
        }
        let actual = response.status;
        let body = response.error_body().await;
        Err(Error::Http {
            expected,
            actual,
            body,
        })
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
        call: Call,
    ) -> Result<Value> {
        log_call!(self, call, %method, path, "calling API");

        let mut request = self.authorized(method, path);
        if let Some(payload) = payload {
            request = request
                .header("Content-Type", "application/json")
                .body(serde_json::to_vec(payload)?);
        }
        let response = self.transport.send(request).await?;
        let response = self.expect(response, call.expected).await?;
        response.json().await
    }

    /// Authenticated GET expecting `200`.
    pub async fn get(&self, path: &str) -> Result<Value> { self.get_with(path, Call::ok()).await }

    pub async fn get_with(&self, path: &str, call: Call) -> Result<Value> {
        self.send_json(Method::Get, path, None, call).await
    }

    /// Authenticated POST expecting `202`.
    pub async fn post(&self, path: &str, payload: &Value) -> Result<Value> {
        self.post_with(path, payload, Call::accepted()).await
    }

    pub async fn post_with(&self, path: &str, payload: &Value, call: Call) -> Result<Value> {
        self.send_json(Method::Post, path, Some(payload), call).await
    }

    /// Authenticated PATCH expecting `202`.
    pub async fn patch(&self, path: &str, payload: &Value) -> Result<Value> {
        self.patch_with(path, payload, Call::accepted()).await
    }

    pub async fn patch_with(&self, path: &str, payload: &Value, call: Call) -> Result<Value> {
        self.send_json(Method::Patch, path, Some(payload), call).await
    }

    /// Stream an authenticated GET into `destination`, returning the number
    /// of bytes written.
    ///
    /// The file is only created once the expected status has been seen, so
    /// a 404 leaves no empty file behind. A body that breaks off midway
    /// removes the partial file.
    pub async fn download_to_file(&self, path: &str, destination: &Path) -> Result<u64> {
        self.download_to_file_with(path, destination, Call::ok()).await
    }

    pub async fn download_to_file_with(
        &self,
        path: &str,
        destination: &Path,
        call: Call,
    ) -> Result<u64> {
        log_call!(self, call, path, destination = %destination.display(), "downloading");

        let response = self.transport.send(self.authorized(Method::Get, path)).await?;
        let response = self.expect(response, call.expected).await?;

        let file = tokio::fs::File::create(destination).await?;
        let written = match write_body(response.body, file).await {
            Ok(written) => written,
            Err(err) => {
                if let Err(remove) = tokio::fs::remove_file(destination).await {
                    warn!(destination = %destination.display(), %remove, "could not remove partial download");
                }
                return Err(err);
            }
        };

        debug!(bytes = written, destination = %destination.display(), "download complete");
        Ok(written)
    }

    /// Authenticated GET that does not follow redirects; returns the
    /// `Location` the API points at.
    pub async fn redirect_location(&self, path: &str) -> Result<String> {
        let request = self.authorized(Method::Get, path).no_redirects();
        let response = self.transport.send(request).await?;
        let status = response.status;

        if status >= 400 {
            let body = response.error_body().await;
            return Err(Error::Http {
                expected: 302,
                actual: status,
                body,
            });
        }
        if !is_redirect(status) {
            return Err(Error::NotRedirect(status));
        }
        response
            .header("Location")
            .map(str::to_string)
            .ok_or(Error::NotRedirect(status))
    }

    /// Unauthenticated PUT of raw bytes to a pre-signed storage URL.
    async fn put_signed(&self, signed_url: &str, bytes: Bytes, content_type: &str) -> Result<HttpResponse> {
        let request = HttpRequest::new(Method::Put, signed_url)
            .header("Content-Type", content_type)
            .body(bytes);
        let response = self.transport.send(request).await?;
        self.expect(response, 200).await
    }

    /// PUT a local file to a pre-signed URL and return the storage version id.
    ///
    /// # Errors
    ///
    /// [`Error::MissingVersionId`] if storage does not report a version,
    /// which means bucket versioning is off.
    pub async fn upload_direct(&self, signed_url: &str, path: &Path) -> Result<DirectUpload> {
        let bytes = tokio::fs::read(path).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "uploading to storage");

        let response = self
            .put_signed(signed_url, Bytes::from(bytes), "application/octet-stream")
            .await?;
        match response.header(STORAGE_VERSION_HEADER) {
            Some(version) => Ok(DirectUpload {
                storage_version_id: version.to_string(),
            }),
            None => {
                warn!("storage accepted the upload without a version id");
                Err(Error::MissingVersionId)
            }
        }
    }

    /// Ask the API for a signed upload URL.
    pub async fn negotiate_upload(&self, filename: &str, content_type: &str) -> Result<UploadUri> {
        let payload = json!({
            "filename": filename,
            "contentType": content_type,
        });
        let value = self.post("/uploadUri", &payload).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Upload a local file through a negotiated signed URL and return the
    /// key the API knows it by.
    ///
    /// Only the base name of `path` is sent to the server unless
    /// [`UploadOptions::filename`] overrides it.
    pub async fn upload(&self, path: &Path, options: &UploadOptions) -> Result<String> {
        let filename = match &options.filename {
            Some(name) => name.clone(),
            None => file_name(path).ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?,
        };
        let bytes = tokio::fs::read(path).await?;

        let upload_uri = self.negotiate_upload(&filename, &options.content_type).await?;
        log_call!(self, Call::ok(), key = %upload_uri.key, "uploading file");

        self.put_signed(&upload_uri.signed_url, Bytes::from(bytes), &options.content_type)
            .await?;
        Ok(upload_uri.key)
    }

    /// Check the credentials against `/accounts/me`.
    ///
    /// Returns `false` on 401 and propagates every other failure.
    pub async fn verify_account(&self) -> Result<bool> {
        match self.get("/accounts/me").await {
            Ok(_) => Ok(true),
            Err(Error::Http { actual: 401, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
