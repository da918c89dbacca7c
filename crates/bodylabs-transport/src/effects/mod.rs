//! I/O operations for API access.
//!
//! Everything that touches the network or the filesystem lives here: the
//! [`Transport`] seam, its implementations, and the authenticated
//! [`Client`] built on top.

mod client;
mod http;
mod mock;

pub use client::{Client, DOWNLOAD_CHUNK_SIZE, STORAGE_VERSION_HEADER};
pub use http::{BoxStream, HttpRequest, HttpResponse, Method, ResponseBody, Transport};
pub use mock::MockTransport;

#[cfg(feature = "reqwest")]
pub use http::ReqwestTransport;
