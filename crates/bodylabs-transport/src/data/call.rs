use serde::{Deserialize, Serialize};

/// Options attached to a single API call.
///
/// Every authenticated call carries the status code it expects. Any other
/// status fails with [`Error::Http`](crate::Error::Http).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub expected: u16,

    /// Whether this call is worth logging at `info` level. The client's own
    /// verbosity must also be on.
    pub verbose: bool,
}

impl Default for Call {
    fn default() -> Self { Self::ok() }
}

impl Call {
    /// Expect `200 OK`.
    pub const fn ok() -> Self { Self::expect(200) }

    /// Expect `202 Accepted`, which the API returns for create and patch.
    pub const fn accepted() -> Self { Self::expect(202) }

    pub const fn expect(expected: u16) -> Self {
        Self {
            expected,
            verbose: true,
        }
    }

    /// Suppress `info` logging for this call. Used for repeated polling.
    #[must_use]
    pub const fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }
}

/// Options for uploading a local file through a negotiated signed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Name reported to the API. Defaults to the file name of the local path.
    pub filename: Option<String>,

    pub content_type: String,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            filename:     None,
            content_type: "application/octet-stream".to_string(),
        }
    }
}

impl UploadOptions {
    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// Response of `POST /uploadUri`: where to PUT the bytes and under which key
/// the API will know them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUri {
    pub key: String,
    pub signed_url: String,
}

/// Result of a direct PUT to object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectUpload {
    /// Value of the storage backend's `x-amz-version-id` header.
    pub storage_version_id: String,
}
