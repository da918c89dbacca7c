mod support;

use bodylabs_api::transport::Method;
use bodylabs_api::{
    Artifact, ArtifactRecord, DownloadOptions, Error, File, FileRecord, Record, Resource, Status,
};
use serde_json::json;
use support::{client, json_body, requests_with, url};

#[tokio::test]
async fn test_file_create() {
    let client = client();
    client
        .transport()
        .push_json(202, json!({"fileId": "123abc", "fileType": "ply"}));

    let mut record = FileRecord::default();
    record
        .extra
        .insert("format".into(), json!("is only validated by actual API"));
    let mut file = File::new(&client, record);
    file.create().await.unwrap();

    assert_eq!(file.id(), Some("123abc"));
    assert_eq!(file.file_type(), Some("ply"));

    let request = &client.transport().requests()[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, url("/files"));
    assert_eq!(json_body(request), json!({"format": "is only validated by actual API"}));
}

#[tokio::test]
async fn test_file_find_by_id() {
    let client = client();
    client
        .transport()
        .push_json(200, json!({"fileId": "response_file_id", "fileType": "ply"}));

    let file = File::find_by_id(&client, "request_file_id").await.unwrap();

    assert_eq!(file.id(), Some("response_file_id"));
    assert_eq!(client.transport().requests()[0].url, url("/files/request_file_id"));
}

#[tokio::test]
async fn test_file_upload_then_finalize_clears_transient_fields() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("test_file_upload.ply");
    std::fs::write(&local, "this is a file").unwrap();

    let client = client();
    client
        .transport()
        .push_with_headers(200, &[("x-amz-version-id", "this-is-the-s3-version-id")], "")
        .push_json(202, json!({"fileId": "123abc", "status": "ready"}));

    let mut file = File::new(
        &client,
        FileRecord {
            file_id: Some("123abc".into()),
            signed_upload_url: Some("https://signed_upload_url".into()),
            ..FileRecord::default()
        },
    );

    file.upload(&local).await.unwrap();
    assert_eq!(file.s3_version_id(), Some("this-is-the-s3-version-id"));

    file.finalize().await.unwrap();
    assert_eq!(file.status(), Some(Status::Ready));
    assert_eq!(file.signed_upload_url(), None);
    assert_eq!(file.s3_version_id(), None);

    let requests = client.transport().requests();
    let put = &requests[0];
    assert_eq!(put.method, Method::Put);
    assert_eq!(put.url, "https://signed_upload_url");
    assert_eq!(put.header_value("Content-Type"), Some("application/octet-stream"));
    assert_eq!(put.body.as_deref(), Some(&b"this is a file"[..]));

    let patch = &requests[1];
    assert_eq!(patch.method, Method::Patch);
    assert_eq!(patch.url, url("/files/123abc"));
    assert_eq!(json_body(patch), json!({"s3VersionId": "this-is-the-s3-version-id"}));
}

#[tokio::test]
async fn test_file_preconditions() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("scan.ply");
    std::fs::write(&local, "x").unwrap();

    let client = client();
    let mut file = File::new(&client, FileRecord::stub("123abc"));

    assert!(matches!(file.upload(&local).await, Err(Error::Precondition(_))));
    assert!(matches!(file.finalize().await, Err(Error::Precondition(_))));
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_file_error_propagated() {
    let client = client();
    let error_json = json!({"code": "NOT_FOUND_RESOURCE", "message": "File 123abc not found"});
    client.transport().push_json(404, error_json.clone());

    let mut file = File::new(
        &client,
        FileRecord {
            file_id: Some("123abc".into()),
            s3_version_id: Some("this-is-the-s3-version-id".into()),
            ..FileRecord::default()
        },
    );
    let err = file.finalize().await.unwrap_err();

    assert!(err.to_string().starts_with("expected status code 202; got 404."));
    match err {
        Error::Transport(bodylabs_api::transport::Error::Http {
            expected,
            actual,
            body,
        }) => {
            assert_eq!((expected, actual), (202, 404));
            assert_eq!(body, error_json);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_file_from_local_path() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("body.ply");
    std::fs::write(&local, "ply").unwrap();

    let client = client();
    client
        .transport()
        .push_json(
            202,
            json!({"fileId": "f1", "fileType": "ply", "signedUploadUrl": "https://bucket/f1"}),
        )
        .push_with_headers(200, &[("x-amz-version-id", "v1")], "")
        .push_json(202, json!({"fileId": "f1", "fileType": "ply", "status": "ready"}));

    let file = File::from_local_path(&client, &local, None).await.unwrap();

    assert_eq!(file.id(), Some("f1"));
    assert_eq!(file.status(), Some(Status::Ready));
    assert_eq!(json_body(&client.transport().requests()[0]), json!({"fileType": "ply"}));
}

#[tokio::test]
async fn test_file_from_local_path_needs_extension() {
    let client = client();
    let err = File::from_local_path(&client, "/scans/body", None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Precondition(_)));
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_artifact_create() {
    let client = client();
    client.transport().push_json(
        202,
        json!({
            "artifactId": "123abc",
            "serviceType": "SomeService",
            "artifactType": "someArtifact",
            "serviceVersion": "v23",
        }),
    );

    let mut artifact = Artifact::new(
        &client,
        ArtifactRecord::request("SomeService", "someArtifact", "i1"),
    );
    artifact.create().await.unwrap();

    assert_eq!(artifact.id(), Some("123abc"));
    assert_eq!(artifact.record().service_version.as_deref(), Some("v23"));
    assert_eq!(
        json_body(&client.transport().requests()[0]),
        json!({"inputId": "i1", "serviceType": "SomeService", "artifactType": "someArtifact"})
    );
}

#[tokio::test]
async fn test_multi_component_create_keeps_components() {
    let client = client();
    client.transport().push_json(
        202,
        json!({
            "artifactId": "123abc",
            "serviceType": "SomeService",
            "components": ["outputOne", "outputTwo"],
        }),
    );

    let mut artifact = Artifact::multi_component(&client, ArtifactRecord::default());
    artifact.create().await.unwrap();

    assert!(artifact.is_multi_component());
    assert_eq!(artifact.components(), ["outputOne", "outputTwo"]);
}

#[tokio::test]
async fn test_non_blocking_download_maps_statuses() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("values.json");

    let client = client();
    client
        .transport()
        .push_json(404, json!({}))
        .push_json(410, json!({}))
        .push_bytes(200, "{\"height\": 180}");

    let mut artifact = Artifact::stub(&client, "a1");
    let options = DownloadOptions::immediate();

    let err = artifact.download(&destination, &options).await.unwrap_err();
    assert!(matches!(err, Error::Processing(_)));
    assert!(err.is_retryable());
    assert!(!destination.exists());

    let err = artifact.download(&destination, &options).await.unwrap_err();
    assert!(matches!(err, Error::ProcessingFailed(_)));

    artifact.download(&destination, &options).await.unwrap();
    assert_eq!(std::fs::read(&destination).unwrap(), b"{\"height\": 180}");

    let gets = requests_with(&client, Method::Get);
    assert_eq!(gets.len(), 3);
    assert!(gets.iter().all(|r| r.url == url("/artifacts/a1?target=contents")));
}

#[tokio::test]
async fn test_unknown_fields_do_not_fail() {
    let client = client();
    client.transport().push_json(
        200,
        json!({
            "artifactId": "a1",
            "status": "pending",
            "serviceType": "footMeasurements",
            "fooBar": 1,
            "BAZ": {"nested": true},
        }),
    );

    let artifact = Resource::<ArtifactRecord, _>::find_by_id(&client, "a1")
        .await
        .unwrap();

    assert_eq!(artifact.status(), Some(Status::Pending));
    assert_eq!(artifact.service_type(), Some("footMeasurements"));
    assert!(artifact.record().extra.is_empty());
}

#[test]
fn test_unknown_fields_are_reported() {
    let (_, unknown) = bodylabs_api::data::decode_with_unknown::<bodylabs_api::InputRecord>(json!({
        "inputId": "i1",
        "fooBar": 1,
        "BAZ": 2,
    }))
    .unwrap();

    assert_eq!(unknown.join(", "), "fooBar, BAZ");
}
