#![allow(dead_code)]

use bodylabs_api::transport::{HttpRequest, Method};
use bodylabs_api::{Client, ClientConfig, MockTransport};
use serde_json::{Value, json};

pub const BASE_URI: &str = "http://base_uri";

/// A quiet client over a fresh scripted transport.
pub fn client() -> Client<MockTransport> {
    Client::with_transport(
        ClientConfig::new(BASE_URI, "access_key", "secret").verbose(false),
        MockTransport::new(),
    )
    .unwrap()
}

pub fn url(path: &str) -> String { format!("{BASE_URI}{path}") }

pub fn artifact(id: &str, status: &str) -> Value { json!({"artifactId": id, "status": status}) }

pub fn requests_with(client: &Client<MockTransport>, method: Method) -> Vec<HttpRequest> {
    client
        .transport()
        .requests()
        .into_iter()
        .filter(|r| r.method == method)
        .collect()
}

pub fn json_body(request: &HttpRequest) -> Value {
    serde_json::from_slice(request.body.as_ref().expect("request has a body")).unwrap()
}
