//! Client for the Body Labs scan-processing API.
//!
//! Upload raw scans, create inputs from them, request derived artifacts
//! (measurements, alignments, matched bodies) and download the results
//! once the backend pipelines finish.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Typed server records, statuses and polling/download options
//! - [`core`] - Pure helpers (contents-status mapping, timeout errors)
//! - [`effects`] - Resources bound to a client, polling and scans
//!
//! [`modality`] adds one façade per scan modality with memoized product
//! accessors. HTTP access comes from [`bodylabs_transport`], re-exported here.
//!
//! # Example
//!
//! ```no_run
//! use bodylabs_api::{Client, ClientConfig, DownloadOptions, FootScan, ScanUploadOptions};
//! use serde_json::json;
//!
//! # async fn run() -> bodylabs_api::Result<()> {
//! let client = Client::new(ClientConfig::new("https://api.bodylabs.com", "key", "secret"))?;
//! let mut scan = FootScan::by_uploading_scan(
//!     &client,
//!     "left_foot.obj",
//!     json!({"side": "left"}),
//!     &ScanUploadOptions::default(),
//! )
//! .await?;
//!
//! scan.measurements()
//!     .await?
//!     .download("left_foot_measurements.json", &DownloadOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod effects;
mod error;
pub mod modality;

pub use bodylabs_transport as transport;
pub use bodylabs_transport::{AuthScheme, Call, Client, ClientConfig, MockTransport, Transport, UploadOptions};

#[cfg(feature = "reqwest")]
pub use bodylabs_transport::ReqwestTransport;

pub use self::core::{TimeoutError, infer_file_type, map_contents_error};
pub use self::data::{
    ArtifactRecord, DownloadOptions, EffectiveDate, FileRecord, InputRecord, Layout, NewInput,
    PollOptions, Record, ScanUploadOptions, Status, TimeLimit,
};
pub use self::effects::{Artifact, File, Resource, Scan, poll_until_ready, with_timeout};
pub use self::error::{Error, Result};
pub use self::modality::{
    FootScan, KinectScan, LaserScan, Modality, MultiSweepScan, Product, RealsenseScan,
};
