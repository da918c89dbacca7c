use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write as _};
use std::path::Path;

use bodylabs_transport::{Client, Transport};
use serde_json::Value;
use tracing::info;

use super::artifact::Artifact;
use super::resource::Resource;
use crate::data::record::warn_unknown;
use crate::data::{
    ArtifactRecord, DownloadOptions, EffectiveDate, InputRecord, NewInput, Record,
    ScanUploadOptions, decode, take_unknown,
};
use crate::error::{Error, Result};
use crate::modality::Product;

/// An uploaded scan (an API input) with the artifacts derived from it.
///
/// Named products requested through [`cached_artifact`](Self::cached_artifact)
/// are memoized: the first call POSTs a new artifact, later calls return the
/// same entry of [`artifacts`](Self::artifacts) without touching the network.
pub struct Scan<'c, T> {
    input:     Resource<'c, InputRecord, T>,
    artifacts: BTreeMap<String, Artifact<'c, T>>,
    memo:      HashMap<(&'static str, &'static str), String>,
}

impl<T> fmt::Debug for Scan<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scan")
            .field("input", &self.input)
            .field("artifacts", &self.artifacts.keys().collect::<Vec<_>>())
            .field("memoized", &self.memo.len())
            .finish()
    }
}

impl<T> fmt::Display for Scan<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(&self.input, f) }
}

fn split_artifacts(record: &mut InputRecord) -> BTreeMap<String, ArtifactRecord> {
    let mut artifacts = std::mem::take(&mut record.artifacts);
    for artifact in artifacts.values_mut() {
        let unknown = take_unknown(artifact);
        warn_unknown(ArtifactRecord::KIND, &unknown);
    }
    artifacts
}

impl<'c, T: Transport> Scan<'c, T> {
    pub fn from_record(client: &'c Client<T>, mut record: InputRecord) -> Self {
        let artifacts = split_artifacts(&mut record)
            .into_iter()
            .map(|(id, artifact)| (id, Resource::new(client, artifact)))
            .collect();
        Self {
            input: Resource::new(client, record),
            artifacts,
            memo: HashMap::new(),
        }
    }

    /// A scan that knows only its id, for requesting artifacts on an input
    /// created elsewhere.
    pub fn stub(client: &'c Client<T>, id: &str) -> Self {
        Self::from_record(client, InputRecord::stub(id))
    }

    /// Create an input referencing an already uploaded object.
    pub async fn create(client: &'c Client<T>, payload: &NewInput) -> Result<Self> {
        if client.is_verbose() {
            info!(input_type = %payload.input_type, "creating Input");
        }
        let payload = serde_json::to_value(payload).map_err(|source| Error::Decode {
            kind: InputRecord::KIND,
            source,
        })?;
        let value = client.post(InputRecord::COLLECTION, &payload).await?;
        let scan = Self::from_record(client, decode(value)?);
        if client.is_verbose() {
            info!("created {scan}");
        }
        Ok(scan)
    }

    pub async fn find_by_id(client: &'c Client<T>, id: &str) -> Result<Self> {
        let value = client.get(&InputRecord::metadata_path(id)).await?;
        Ok(Self::from_record(client, decode(value)?))
    }

    /// Upload a raw scan file and create an input of `input_type` for it.
    ///
    /// The effective date defaults to now.
    pub async fn by_uploading_scan(
        client: &'c Client<T>,
        path: impl AsRef<Path>,
        input_type: &str,
        parameters: Value,
        options: &ScanUploadOptions,
    ) -> Result<Self> {
        let effective_date = options.effective_date.clone().unwrap_or_else(EffectiveDate::now);
        let key = client.upload(path.as_ref(), &options.upload).await?;
        let payload = NewInput::new(input_type, key, parameters).effective_date(&effective_date);
        Self::create(client, &payload).await
    }

    pub fn id(&self) -> Option<&str> { self.input.id() }

    pub fn input(&self) -> &Resource<'c, InputRecord, T> { &self.input }

    pub fn record(&self) -> &InputRecord { self.input.record() }

    pub fn client(&self) -> &'c Client<T> { self.input.client() }

    /// Artifacts known for this input, keyed by artifact id.
    pub fn artifacts(&self) -> &BTreeMap<String, Artifact<'c, T>> { &self.artifacts }

    pub fn artifact(&self, id: &str) -> Option<&Artifact<'c, T>> { self.artifacts.get(id) }

    /// Re-read the input, merging in any artifacts the server reports.
    ///
    /// Known artifacts keep their layout and download history; only their
    /// records are replaced.
    pub async fn refresh(&mut self) -> Result<&mut Self> {
        self.input.refresh().await?;
        let client = self.input.client();
        for (id, record) in split_artifacts(self.input.record_mut()) {
            match self.artifacts.entry(id) {
                Entry::Occupied(mut entry) => entry.get_mut().record = record,
                Entry::Vacant(entry) => {
                    entry.insert(Resource::new(client, record));
                }
            }
        }
        Ok(self)
    }

    /// Ask the API to compute `artifact_type` with the `service_type`
    /// pipeline for this input.
    pub async fn request_artifact(
        &mut self,
        service_type: &str,
        artifact_type: &str,
    ) -> Result<&mut Artifact<'c, T>> {
        let input_id = self.input.require_id()?;
        let client = self.input.client();
        if client.is_verbose() {
            info!("requesting {service_type} artifact {artifact_type} for {self}");
        }

        let request = ArtifactRecord::request(service_type, artifact_type, input_id);
        let payload = serde_json::to_value(&request).map_err(|source| Error::Decode {
            kind: ArtifactRecord::KIND,
            source,
        })?;
        let value = client.post(ArtifactRecord::COLLECTION, &payload).await?;
        let artifact = Resource::new(client, decode::<ArtifactRecord>(value)?);

        let id = artifact.require_id()?;
        if client.is_verbose() {
            info!("requested {artifact}");
        }
        Ok(match self.artifacts.entry(id) {
            Entry::Occupied(mut entry) => {
                entry.insert(artifact);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(artifact),
        })
    }

    /// The artifact for `product`, requested on first use and cached for the
    /// lifetime of this scan.
    pub async fn cached_artifact(&mut self, product: &Product) -> Result<&mut Artifact<'c, T>> {
        let key = (product.service_type, product.artifact_type);
        let cached = self
            .memo
            .get(&key)
            .filter(|id| self.artifacts.contains_key(id.as_str()))
            .cloned();
        let id = match cached {
            Some(id) => id,
            None => {
                let id = self
                    .request_artifact(product.service_type, product.artifact_type)
                    .await?
                    .require_id()?;
                self.memo.insert(key, id.clone());
                id
            }
        };
        self.artifacts
            .get_mut(&id)
            .ok_or(Error::MissingId(ArtifactRecord::KIND))
    }

    /// Download the original uploaded scan.
    pub async fn download_source(&mut self, destination: impl AsRef<Path>) -> Result<&mut Self> {
        self.input
            .download(destination, &DownloadOptions::immediate())
            .await?;
        Ok(self)
    }

    /// Multi-line dump of the input and its artifacts, for debugging.
    pub fn describe(&self) -> String {
        let record = self.input.record();
        let mut out = String::new();
        let show = |value: Option<&Value>| value.map_or_else(|| "None".to_string(), Value::to_string);

        let _ = writeln!(out, "Input {}:", self.id().unwrap_or("(unsaved)"));
        let _ = writeln!(out, "  Connected to: {}", self.client().config().base_uri);
        let _ = writeln!(out, "  Person id: {}", record.person_id.as_deref().unwrap_or("None"));
        let _ = writeln!(out, "  Effective date: {}", show(record.effective_date.as_ref()));
        let _ = writeln!(out, "  Date created: {}", show(record.date_created.as_ref()));
        match &record.files {
            Some(files) if !files.is_empty() => {
                let _ = writeln!(out, "  Files:");
                for (name, path) in files {
                    let _ = writeln!(out, "    {name}: {path}");
                }
            }
            _ => {
                let _ = writeln!(out, "  Files: None");
            }
        }
        if self.artifacts.is_empty() {
            let _ = writeln!(out, "  Artifacts: None");
        } else {
            let _ = writeln!(out, "  Artifacts:");
            for (id, artifact) in &self.artifacts {
                let a = artifact.record();
                let _ = writeln!(out, "    Artifact {id}:");
                let _ = writeln!(out, "      Status: {}", a.status.map_or("None", |s| s.as_str()));
                let _ = writeln!(out, "      Service type: {}", a.service_type.as_deref().unwrap_or("None"));
                let _ = writeln!(out, "      Artifact type: {}", a.artifact_type.as_deref().unwrap_or("None"));
                if let Some(seconds) = a.processing_time_in_seconds {
                    let _ = writeln!(out, "      Processing time (in seconds): {seconds}");
                }
            }
        }
        out
    }
}
