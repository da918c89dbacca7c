use chrono::{DateTime, Utc};
use serde_json::Value;

/// The date a scan was taken, as sent in `effectiveDate`.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectiveDate {
    /// Normalized to integer milliseconds since the Unix epoch.
    At(DateTime<Utc>),

    /// Sent to the server unchanged.
    Raw(Value),
}

impl EffectiveDate {
    pub fn now() -> Self { EffectiveDate::At(Utc::now()) }

    pub fn to_value(&self) -> Value {
        match self {
            EffectiveDate::At(at) => Value::from(at.timestamp_millis()),
            EffectiveDate::Raw(value) => value.clone(),
        }
    }
}

impl From<DateTime<Utc>> for EffectiveDate {
    fn from(at: DateTime<Utc>) -> Self { EffectiveDate::At(at) }
}
