use std::fmt;
use std::path::{Path, PathBuf};

use bodylabs_transport::{Call, Client, Transport};
use tracing::{debug, info};

use super::poll::poll_until_ready;
use crate::core::map_contents_error;
use crate::data::{DownloadOptions, Layout, Record, Status, decode};
use crate::error::{Error, Result};

/// A server record bound to the client that fetched it.
///
/// Every `create` and `refresh` replaces the whole record with the server's
/// answer. A resource is owned by one caller at a time; the client it
/// borrows can be shared freely.
pub struct Resource<'c, R, T> {
    pub(crate) record:        R,
    pub(crate) client:        &'c Client<T>,
    pub(crate) layout:        Layout,
    pub(crate) downloaded_to: Option<PathBuf>,
}

impl<R: Clone, T> Clone for Resource<'_, R, T> {
    fn clone(&self) -> Self {
        Self {
            record:        self.record.clone(),
            client:        self.client,
            layout:        self.layout.clone(),
            downloaded_to: self.downloaded_to.clone(),
        }
    }
}

impl<R: fmt::Debug, T> fmt::Debug for Resource<'_, R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("record", &self.record)
            .field("layout", &self.layout)
            .field("downloaded_to", &self.downloaded_to)
            .finish_non_exhaustive()
    }
}

impl<R: Record, T> fmt::Display for Resource<'_, R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", R::KIND, self.record.id().unwrap_or("(unsaved)"))
    }
}

impl<'c, R: Record, T: Transport> Resource<'c, R, T> {
    pub fn new(client: &'c Client<T>, record: R) -> Self {
        Self {
            record,
            client,
            layout: Layout::Single,
            downloaded_to: None,
        }
    }

    /// A resource that knows only its id.
    pub fn stub(client: &'c Client<T>, id: &str) -> Self { Self::new(client, R::stub(id)) }

    /// Fetch a resource by id.
    pub async fn find_by_id(client: &'c Client<T>, id: &str) -> Result<Self> {
        let mut resource = Self::stub(client, id);
        resource.refresh().await?;
        Ok(resource)
    }

    pub fn record(&self) -> &R { &self.record }

    pub fn record_mut(&mut self) -> &mut R { &mut self.record }

    pub fn into_record(self) -> R { self.record }

    pub fn client(&self) -> &'c Client<T> { self.client }

    pub fn id(&self) -> Option<&str> { self.record.id() }

    pub fn status(&self) -> Option<Status> { self.record.status() }

    pub fn layout(&self) -> &Layout { &self.layout }

    /// Where the last [`download`](Self::download) wrote to.
    pub fn downloaded_to(&self) -> Option<&Path> { self.downloaded_to.as_deref() }

    pub(crate) fn require_id(&self) -> Result<String> {
        self.record
            .id()
            .map(str::to_string)
            .ok_or(Error::MissingId(R::KIND))
    }

    /// POST the record to its collection and adopt the server's answer,
    /// which carries the new id.
    pub async fn create(&mut self) -> Result<&mut Self> {
        if self.client.is_verbose() {
            info!("creating {}", R::KIND);
        }
        let payload = serde_json::to_value(&self.record).map_err(|source| Error::Decode {
            kind: R::KIND,
            source,
        })?;
        let value = self.client.post(R::COLLECTION, &payload).await?;
        self.record = decode(value)?;
        debug!(resource = %self, "created");
        Ok(self)
    }

    /// Re-read the record from the server.
    pub async fn refresh(&mut self) -> Result<&mut Self> { self.refresh_with(Call::ok()).await }

    pub async fn refresh_with(&mut self, call: Call) -> Result<&mut Self> {
        let id = self.require_id()?;
        let value = self.client.get_with(&R::metadata_path(&id), call).await?;
        self.record = decode(value)?;
        Ok(self)
    }

    /// Download the resource's contents to `destination`.
    ///
    /// When `options.blocking` is set and the resource is processed
    /// asynchronously, polls until it is ready first.
    ///
    /// # Errors
    ///
    /// - [`Error::Precondition`] for a multi-component artifact, which has no
    ///   single contents document
    /// - [`Error::Processing`] / [`Error::ProcessingFailed`] when the contents
    ///   endpoint answers 404 / 410
    /// - [`Error::Timeout`] when polling runs past its limit
    pub async fn download(
        &mut self,
        destination: impl AsRef<Path>,
        options: &DownloadOptions,
    ) -> Result<&mut Self> {
        if self.layout.is_multi_component() {
            return Err(Error::Precondition(format!(
                "{self} has no single download URI; use download_component instead"
            )));
        }
        let id = self.require_id()?;
        if options.blocking && R::PROCESSED {
            poll_until_ready(self, &options.poll).await?;
        }

        let destination = destination.as_ref();
        self.fetch_contents(&R::contents_path(&id), destination).await?;
        self.downloaded_to = Some(destination.to_path_buf());
        Ok(self)
    }

    pub(crate) async fn fetch_contents(&self, path: &str, destination: &Path) -> Result<u64> {
        if self.client.is_verbose() {
            info!("downloading {self}");
        }
        match self.client.download_to_file(path, destination).await {
            Ok(written) => Ok(written),
            Err(err) if R::PROCESSED => Err(map_contents_error(err, &self.to_string())),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ArtifactRecord, FileRecord, InputRecord};
    use bodylabs_transport::{ClientConfig, MockTransport};
    use serde_json::json;

    fn client() -> Client<MockTransport> {
        Client::with_transport(
            ClientConfig::new("http://base_uri", "access_key", "secret").verbose(false),
            MockTransport::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_display() {
        let client = client();
        let artifact = Resource::<ArtifactRecord, _>::stub(&client, "123abc");
        assert_eq!(artifact.to_string(), "<Artifact 123abc>");

        let unsaved = Resource::new(&client, FileRecord::of_type("ply"));
        assert_eq!(unsaved.to_string(), "<File (unsaved)>");
    }

    #[tokio::test]
    async fn test_refresh_without_id() {
        let client = client();
        let mut file = Resource::new(&client, FileRecord::of_type("ply"));

        let err = file.refresh().await.unwrap_err();
        assert!(matches!(err, Error::MissingId("File")));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_input_contents_are_not_mapped() {
        let dir = tempfile::tempdir().unwrap();
        let client = client();
        client.transport().push_json(404, json!({}));

        let mut input = Resource::<InputRecord, _>::stub(&client, "i1");
        let err = input
            .download(dir.path().join("scan.obj"), &DownloadOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            client.transport().requests()[0].url,
            "http://base_uri/inputs/i1?target=contents"
        );
    }
}
