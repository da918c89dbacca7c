use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bodylabs_transport::{Client, Transport};

use super::poll::poll_until_ready;
use super::resource::Resource;
use crate::core::map_contents_error;
use crate::data::{ArtifactRecord, DownloadOptions, Layout, Record};
use crate::error::{Error, Result};

/// A derived product of an input, computed asynchronously by a pipeline.
pub type Artifact<'c, T> = Resource<'c, ArtifactRecord, T>;

impl<'c, T: Transport> Resource<'c, ArtifactRecord, T> {
    /// An artifact whose outputs are downloaded component by component.
    pub fn multi_component(client: &'c Client<T>, record: ArtifactRecord) -> Self {
        let mut artifact = Self::new(client, record);
        artifact.layout = Layout::components();
        artifact
    }

    pub async fn find_multi_component_by_id(client: &'c Client<T>, id: &str) -> Result<Self> {
        let mut artifact = Self::find_by_id(client, id).await?;
        artifact.layout = Layout::components();
        Ok(artifact)
    }

    pub fn is_multi_component(&self) -> bool { self.layout.is_multi_component() }

    pub fn service_type(&self) -> Option<&str> { self.record.service_type.as_deref() }

    pub fn artifact_type(&self) -> Option<&str> { self.record.artifact_type.as_deref() }

    /// Component names from the last refresh.
    pub fn components(&self) -> &[String] { self.record.components.as_deref().unwrap_or(&[]) }

    /// Components downloaded so far and where they went.
    pub fn downloaded_components(&self) -> Option<&BTreeMap<String, PathBuf>> {
        match &self.layout {
            Layout::Components { downloaded } => Some(downloaded),
            Layout::Single => None,
        }
    }

    pub fn component_path(&self, component: &str) -> Result<String> {
        let id = self.require_id()?;
        Ok(format!("/artifacts/{id}/components/{component}"))
    }

    /// Download one named component of a multi-component artifact.
    ///
    /// Refreshes first and fails fast with [`Error::Precondition`] if the
    /// artifact does not list `component`.
    pub async fn download_component(
        &mut self,
        component: &str,
        destination: impl AsRef<Path>,
        options: &DownloadOptions,
    ) -> Result<&mut Self> {
        if !self.is_multi_component() {
            return Err(Error::Precondition(format!(
                "{self} is a single-download artifact; use download instead"
            )));
        }
        let path = self.component_path(component)?;

        self.refresh().await?;
        if !self.components().iter().any(|c| c == component) {
            return Err(Error::Precondition(format!("{self} has no component {component}")));
        }
        if options.blocking {
            poll_until_ready(self, &options.poll).await?;
        }

        let destination = destination.as_ref();
        self.fetch_contents(&path, destination).await?;
        if let Layout::Components { downloaded } = &mut self.layout {
            downloaded.insert(component.to_string(), destination.to_path_buf());
        }
        Ok(self)
    }

    /// Signed storage URL of the contents, without downloading them.
    pub async fn content_location(&self) -> Result<String> {
        let id = self.require_id()?;
        self.client
            .redirect_location(&ArtifactRecord::contents_path(&id))
            .await
            .map_err(|err| map_contents_error(err, &self.to_string()))
    }
}
