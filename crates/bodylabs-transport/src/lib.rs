//! Authenticated HTTP access to the Body Labs processing API.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Configuration, per-call options and wire payloads
//! - [`core`] - Pure helpers (auth header, URL joining, status classification)
//! - [`effects`] - The [`Transport`] abstraction and the [`Client`] verb wrappers
//!
//! # Key Features
//!
//! - **Status contracts**: every authenticated call states the status it expects
//!   and fails with [`Error::Http`] carrying the parsed error body otherwise
//! - **Streaming downloads**: response bodies are written to disk chunk by chunk
//! - **Signed uploads**: upload-URL negotiation and direct PUT to object storage
//! - **Mechanism-only**: no retry policy; callers decide what a 404 or 410 means

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use self::core::{API_VERSION_HEADER, authorization_header, is_redirect, join_url};
pub use self::data::{AuthScheme, Call, ClientConfig, DirectUpload, UploadOptions, UploadUri};
pub use self::effects::{
    BoxStream, Client, DOWNLOAD_CHUNK_SIZE, HttpRequest, HttpResponse, Method, MockTransport,
    ResponseBody, STORAGE_VERSION_HEADER, Transport,
};

#[cfg(feature = "reqwest")]
pub use self::effects::ReqwestTransport;

pub use self::error::{Error, Result};
