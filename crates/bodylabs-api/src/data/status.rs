use std::fmt;

use serde::{Deserialize, Serialize};

/// Processing status reported by the server.
///
/// Anything the client does not recognize decodes as [`Status::Unknown`]
/// and is polled like `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Pending,
    Ready,
    Failed,
    #[serde(other)]
    Unknown,
}

impl Status {
    pub fn is_terminal(self) -> bool { matches!(self, Status::Ready | Status::Failed) }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Pending => "pending",
            Status::Ready => "ready",
            Status::Failed => "failed",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
