use std::fmt;
use std::time::Duration;

use crate::data::TimeLimit;

/// A guarded operation ran past its [`TimeLimit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutError {
    pub message:   String,
    pub limit:     Duration,
    pub operation: Option<String>,
}

impl TimeoutError {
    pub fn new(limit: &TimeLimit) -> Self {
        Self {
            message:   limit.describe(),
            limit:     limit.total(),
            operation: None,
        }
    }

    /// Name the operation that was cut off.
    #[must_use]
    pub fn during(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }
}

impl fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operation {
            Some(operation) => write!(f, "{operation}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for TimeoutError {}
