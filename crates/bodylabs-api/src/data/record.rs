//! Typed server records.
//!
//! Each record keeps the fields the client understands. Anything else the
//! server sends lands in `extra`, is reported once through `tracing` and then
//! dropped, so new server fields never break decoding. Keys placed in `extra`
//! by the caller before a `create` are sent along with the payload.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::date::EffectiveDate;
use super::status::Status;
use crate::error::{Error, Result};

/// A server resource addressed by an id under a collection path.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Human name used in messages, e.g. `Artifact`.
    const KIND: &'static str;

    /// JSON field holding the server-assigned id.
    const ID_FIELD: &'static str;

    /// Collection path new records are POSTed to.
    const COLLECTION: &'static str;

    /// Whether contents are produced asynchronously, so that fetching them
    /// may answer 404 (processing) or 410 (failed).
    const PROCESSED: bool = true;

    /// A record carrying only its id.
    fn stub(id: &str) -> Self;

    fn id(&self) -> Option<&str>;

    fn status(&self) -> Option<Status>;

    fn extra(&self) -> &Map<String, Value>;

    fn extra_mut(&mut self) -> &mut Map<String, Value>;

    fn metadata_path(id: &str) -> String { format!("{}/{id}", Self::COLLECTION) }

    fn contents_path(id: &str) -> String { format!("{}/{id}/download", Self::COLLECTION) }
}

/// Remove and return the names of fields the client did not recognize.
pub fn take_unknown<R: Record>(record: &mut R) -> Vec<String> {
    std::mem::take(record.extra_mut()).into_iter().map(|(key, _)| key).collect()
}

pub(crate) fn warn_unknown(kind: &str, keys: &[String]) {
    if !keys.is_empty() {
        warn!("{kind} received extra args from server: {}", keys.join(", "));
    }
}

/// Decode a server payload, returning the record and the unknown keys that
/// were dropped from it.
pub fn decode_with_unknown<R: Record>(value: Value) -> Result<(R, Vec<String>)> {
    let mut record: R = serde_json::from_value(value).map_err(|source| Error::Decode {
        kind: R::KIND,
        source,
    })?;
    let unknown = take_unknown(&mut record);
    Ok((record, unknown))
}

/// Decode a server payload, warning about and dropping unknown keys.
pub fn decode<R: Record>(value: Value) -> Result<R> {
    let (record, unknown) = decode_with_unknown::<R>(value)?;
    warn_unknown(R::KIND, &unknown);
    Ok(record)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_in_seconds: Option<f64>,

    /// Named outputs of a multi-component artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArtifactRecord {
    /// Payload asking for one product of an input's pipeline.
    pub fn request(
        service_type: impl Into<String>,
        artifact_type: impl Into<String>,
        input_id: impl Into<String>,
    ) -> Self {
        Self {
            service_type: Some(service_type.into()),
            artifact_type: Some(artifact_type.into()),
            input_id: Some(input_id.into()),
            ..Self::default()
        }
    }
}

impl Record for ArtifactRecord {
    const KIND: &'static str = "Artifact";
    const ID_FIELD: &'static str = "artifactId";
    const COLLECTION: &'static str = "/artifacts";

    fn stub(id: &str) -> Self {
        Self {
            artifact_id: Some(id.to_string()),
            ..Self::default()
        }
    }

    fn id(&self) -> Option<&str> { self.artifact_id.as_deref() }

    fn status(&self) -> Option<Status> { self.status }

    fn extra(&self) -> &Map<String, Value> { &self.extra }

    fn extra_mut(&mut self) -> &mut Map<String, Value> { &mut self.extra }

    fn contents_path(id: &str) -> String { format!("/artifacts/{id}?target=contents") }
}

/// An uploaded file tracked by the API.
///
/// `signed_upload_url` only exists between create and finalize;
/// `s3_version_id` only between upload and finalize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_upload_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_version_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileRecord {
    pub fn of_type(file_type: impl Into<String>) -> Self {
        Self {
            file_type: Some(file_type.into()),
            ..Self::default()
        }
    }
}

impl Record for FileRecord {
    const KIND: &'static str = "File";
    const ID_FIELD: &'static str = "fileId";
    const COLLECTION: &'static str = "/files";

    fn stub(id: &str) -> Self {
        Self {
            file_id: Some(id.to_string()),
            ..Self::default()
        }
    }

    fn id(&self) -> Option<&str> { self.file_id.as_deref() }

    fn status(&self) -> Option<Status> { self.status }

    fn extra(&self) -> &Map<String, Value> { &self.extra }

    fn extra_mut(&mut self) -> &mut Map<String, Value> { &mut self.extra }
}

/// An uploaded scan and the artifacts derived from it so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub artifacts: BTreeMap<String, ArtifactRecord>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for InputRecord {
    const KIND: &'static str = "Input";
    const ID_FIELD: &'static str = "inputId";
    const COLLECTION: &'static str = "/inputs";
    const PROCESSED: bool = false;

    fn stub(id: &str) -> Self {
        Self {
            input_id: Some(id.to_string()),
            ..Self::default()
        }
    }

    fn id(&self) -> Option<&str> { self.input_id.as_deref() }

    fn status(&self) -> Option<Status> { None }

    fn extra(&self) -> &Map<String, Value> { &self.extra }

    fn extra_mut(&mut self) -> &mut Map<String, Value> { &mut self.extra }

    fn metadata_path(id: &str) -> String { format!("/inputs/{id}?target=metadata") }

    fn contents_path(id: &str) -> String { format!("/inputs/{id}?target=contents") }
}

/// Payload of `POST /inputs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInput {
    pub input_type: String,
    pub uploaded_object_key: String,
    pub parameters: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<Value>,
}

impl NewInput {
    pub fn new(
        input_type: impl Into<String>,
        uploaded_object_key: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            input_type: input_type.into(),
            uploaded_object_key: uploaded_object_key.into(),
            parameters,
            effective_date: None,
        }
    }

    #[must_use]
    pub fn effective_date(mut self, date: &EffectiveDate) -> Self {
        self.effective_date = Some(date.to_value());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_unknown_fields_are_collected_in_order() {
        let (input, unknown) = decode_with_unknown::<InputRecord>(json!({
            "inputId": "i1",
            "personId": "p1",
            "fooBar": 1,
            "BAZ": "x",
        }))
        .unwrap();

        assert_eq!(input.input_id.as_deref(), Some("i1"));
        assert_eq!(input.person_id.as_deref(), Some("p1"));
        assert_eq!(unknown, ["fooBar", "BAZ"]);
        assert!(input.extra.is_empty());
    }

    #[test]
    fn test_artifact_fields() {
        let artifact: ArtifactRecord = decode(json!({
            "artifactId": "123abc",
            "serviceType": "SomeService",
            "artifactType": "someArtifact",
            "serviceVersion": "v23",
            "status": "pending",
            "processingTimeInSeconds": 12.5,
            "components": ["outputOne", "outputTwo"],
        }))
        .unwrap();

        assert_eq!(artifact.id(), Some("123abc"));
        assert_eq!(artifact.status(), Some(Status::Pending));
        assert_eq!(artifact.service_version.as_deref(), Some("v23"));
        assert_eq!(artifact.processing_time_in_seconds, Some(12.5));
        assert_eq!(
            artifact.components.as_deref(),
            Some(&["outputOne".to_string(), "outputTwo".to_string()][..])
        );
    }

    #[test]
    fn test_paths() {
        assert_eq!(ArtifactRecord::metadata_path("a1"), "/artifacts/a1");
        assert_eq!(ArtifactRecord::contents_path("a1"), "/artifacts/a1?target=contents");
        assert_eq!(FileRecord::metadata_path("f1"), "/files/f1");
        assert_eq!(FileRecord::contents_path("f1"), "/files/f1/download");
        assert_eq!(InputRecord::metadata_path("i1"), "/inputs/i1?target=metadata");
        assert_eq!(InputRecord::contents_path("i1"), "/inputs/i1?target=contents");
    }

    fn assert_stub_serializes_id<R: Record>() {
        assert_eq!(serde_json::to_value(R::stub("x1")).unwrap(), json!({ (R::ID_FIELD): "x1" }));
    }

    #[test]
    fn test_stub_carries_only_id_field() {
        assert_stub_serializes_id::<ArtifactRecord>();
        assert_stub_serializes_id::<FileRecord>();
        assert_stub_serializes_id::<InputRecord>();
    }

    #[test]
    fn test_create_payload_skips_absent_fields_and_keeps_extra() {
        let mut file = FileRecord::of_type("ply");
        file.extra.insert("format".into(), json!("validated by the server"));

        assert_eq!(
            serde_json::to_value(&file).unwrap(),
            json!({"fileType": "ply", "format": "validated by the server"})
        );
    }

    #[test]
    fn test_new_input_payload() {
        let at = Utc.with_ymd_and_hms(2016, 5, 26, 12, 0, 0).unwrap();
        let payload = NewInput::new("footScan", "uploads/k1", json!({"unit": "cm"}))
            .effective_date(&EffectiveDate::At(at));

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "inputType": "footScan",
                "uploadedObjectKey": "uploads/k1",
                "parameters": {"unit": "cm"},
                "effectiveDate": 1_464_264_000_000_i64,
            })
        );
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = decode::<FileRecord>(json!("nope")).unwrap_err();
        assert!(matches!(err, Error::Decode { kind: "File", .. }));
    }
}
