use std::path::Path;

use bodylabs_transport::{Client, Transport};
use serde_json::json;
use tracing::debug;

use super::resource::Resource;
use crate::core::infer_file_type;
use crate::data::{FileRecord, Record, decode};
use crate::error::{Error, Result};

/// A file stored through the API.
///
/// Lifecycle: `create` hands out a signed upload URL, `upload` puts the
/// bytes there and records the storage version id, `finalize` confirms the
/// version and clears both transient fields.
pub type File<'c, T> = Resource<'c, FileRecord, T>;

impl<'c, T: Transport> Resource<'c, FileRecord, T> {
    /// Create, upload and finalize a local file in one go.
    ///
    /// `file_type` defaults to the path's extension.
    pub async fn from_local_path(
        client: &'c Client<T>,
        path: impl AsRef<Path>,
        file_type: Option<&str>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file_type = match file_type {
            Some(file_type) => file_type.to_string(),
            None => infer_file_type(path)?,
        };

        let mut file = Self::new(client, FileRecord::of_type(file_type));
        file.create().await?.upload(path).await?.finalize().await?;
        Ok(file)
    }

    pub fn file_type(&self) -> Option<&str> { self.record.file_type.as_deref() }

    pub fn signed_upload_url(&self) -> Option<&str> { self.record.signed_upload_url.as_deref() }

    pub fn s3_version_id(&self) -> Option<&str> { self.record.s3_version_id.as_deref() }

    /// PUT `path` to the signed upload URL handed out by `create`.
    pub async fn upload(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let Some(signed_url) = self.record.signed_upload_url.clone() else {
            return Err(Error::Precondition(format!(
                "can't upload {self} without signed_upload_url from create"
            )));
        };

        let upload = self.client.upload_direct(&signed_url, path.as_ref()).await?;
        debug!(file = %self, version = %upload.storage_version_id, "uploaded");
        self.record.s3_version_id = Some(upload.storage_version_id);
        Ok(self)
    }

    /// Confirm the uploaded version with the API.
    pub async fn finalize(&mut self) -> Result<&mut Self> {
        let Some(version) = self.record.s3_version_id.clone() else {
            return Err(Error::Precondition(format!(
                "can't finalize {self} without s3_version_id from upload"
            )));
        };
        let id = self.require_id()?;

        let value = self
            .client
            .patch(&FileRecord::metadata_path(&id), &json!({ "s3VersionId": version }))
            .await?;
        let mut record: FileRecord = decode(value)?;
        record.signed_upload_url = None;
        record.s3_version_id = None;
        self.record = record;
        Ok(self)
    }
}
