//! Immutable records and options.
//!
//! Server payloads decode into the typed records here; options describe how
//! polling and downloads behave. Nothing in this module performs I/O.

pub mod date;
pub mod limit;
pub mod options;
pub mod record;
pub mod status;

pub use date::EffectiveDate;
pub use limit::TimeLimit;
pub use options::{DownloadOptions, Layout, PollOptions, ScanUploadOptions};
pub use record::{
    ArtifactRecord, FileRecord, InputRecord, NewInput, Record, decode, decode_with_unknown,
    take_unknown,
};
pub use status::Status;
