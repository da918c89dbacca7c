//! Immutable data types for API access.
//!
//! This module contains the client configuration, per-call options and the
//! small wire payloads exchanged during upload negotiation. None of these
//! types perform I/O.

pub mod call;
pub mod config;

pub use call::{Call, DirectUpload, UploadOptions, UploadUri};
pub use config::{AuthScheme, ClientConfig, DEFAULT_API_VERSION};
