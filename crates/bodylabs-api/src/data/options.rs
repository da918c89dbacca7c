use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use bodylabs_transport::UploadOptions;

use super::date::EffectiveDate;
use super::limit::TimeLimit;

/// How a resource is polled until it reaches a terminal status.
///
/// The interval is constant. There is no backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    /// Pause between refreshes.
    ///
    /// Default: 10 seconds
    pub interval: Duration,

    /// Overall deadline for the whole poll.
    ///
    /// Default: 20 minutes
    pub timeout: TimeLimit,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout:  TimeLimit::minutes(20),
        }
    }
}

impl PollOptions {
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: TimeLimit) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Poll until ready before downloading. When false the contents are
    /// fetched once and a resource that is not ready fails with
    /// [`Error::Processing`](crate::Error::Processing).
    ///
    /// Default: true
    pub blocking: bool,

    pub poll: PollOptions,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            blocking: true,
            poll:     PollOptions::default(),
        }
    }
}

impl DownloadOptions {
    /// Check once without polling.
    pub fn immediate() -> Self {
        Self {
            blocking: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    #[must_use]
    pub fn poll(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }
}

/// Options for [`Scan::by_uploading_scan`](crate::Scan::by_uploading_scan).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanUploadOptions {
    pub upload: UploadOptions,

    /// Stamp on the created input. Defaults to the time of upload.
    pub effective_date: Option<EffectiveDate>,
}

impl ScanUploadOptions {
    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.upload = self.upload.filename(filename);
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.upload = self.upload.content_type(content_type);
        self
    }

    #[must_use]
    pub fn effective_date(mut self, date: EffectiveDate) -> Self {
        self.effective_date = Some(date);
        self
    }
}

/// How an artifact's contents are laid out server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Layout {
    /// One contents document.
    #[default]
    Single,

    /// Several named components, each downloaded separately.
    Components {
        downloaded: BTreeMap<String, PathBuf>,
    },
}

impl Layout {
    pub fn components() -> Self {
        Layout::Components {
            downloaded: BTreeMap::new(),
        }
    }

    pub fn is_multi_component(&self) -> bool { matches!(self, Layout::Components { .. }) }
}
