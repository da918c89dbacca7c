use std::time::Duration;

/// A deadline expressed the way people say it: hours, minutes and seconds.
///
/// Components add up. A limit with no components, or only zero components,
/// is unlimited and disables the guard.
///
/// ```
/// use bodylabs_api::TimeLimit;
///
/// let limit = TimeLimit::minutes(20).and_seconds(30);
/// assert_eq!(limit.total().as_secs(), 1230);
/// assert_eq!(limit.describe(), "Timeout reached after 20 minute(s) 30 second(s)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeLimit {
    pub hours:   Option<u64>,
    pub minutes: Option<u64>,
    pub seconds: Option<u64>,

    /// Template for the timeout message. `{hours}`, `{minutes}`, `{seconds}`
    /// and `{total_seconds}` are substituted.
    pub message: Option<String>,
}

impl TimeLimit {
    pub fn unlimited() -> Self { Self::default() }

    pub fn hours(hours: u64) -> Self {
        Self {
            hours: Some(hours),
            ..Self::default()
        }
    }

    pub fn minutes(minutes: u64) -> Self {
        Self {
            minutes: Some(minutes),
            ..Self::default()
        }
    }

    pub fn seconds(seconds: u64) -> Self {
        Self {
            seconds: Some(seconds),
            ..Self::default()
        }
    }

    /// Whole seconds of `duration`, rounded up so a sub-second limit still
    /// fires.
    pub fn from_duration(duration: Duration) -> Self {
        if duration.is_zero() {
            return Self::unlimited();
        }
        Self::seconds(
            duration
                .as_secs()
                .saturating_add(u64::from(duration.subsec_nanos() > 0)),
        )
    }

    #[must_use]
    pub fn and_hours(mut self, hours: u64) -> Self {
        self.hours = Some(hours);
        self
    }

    #[must_use]
    pub fn and_minutes(mut self, minutes: u64) -> Self {
        self.minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn and_seconds(mut self, seconds: u64) -> Self {
        self.seconds = Some(seconds);
        self
    }

    #[must_use]
    pub fn message(mut self, template: impl Into<String>) -> Self {
        self.message = Some(template.into());
        self
    }

    /// Sum of all components. Saturates at `u64::MAX`.
    pub fn total_seconds(&self) -> u64 {
        self.hours
            .unwrap_or(0)
            .saturating_mul(3600)
            .saturating_add(self.minutes.unwrap_or(0).saturating_mul(60))
            .saturating_add(self.seconds.unwrap_or(0))
    }

    pub fn total(&self) -> Duration { Duration::from_secs(self.total_seconds()) }

    pub fn is_unlimited(&self) -> bool { self.total_seconds() == 0 }

    /// The message reported when the limit is hit.
    pub fn describe(&self) -> String {
        if let Some(template) = &self.message {
            return template
                .replace("{hours}", &self.hours.unwrap_or(0).to_string())
                .replace("{minutes}", &self.minutes.unwrap_or(0).to_string())
                .replace("{seconds}", &self.seconds.unwrap_or(0).to_string())
                .replace("{total_seconds}", &self.total_seconds().to_string());
        }

        let mut message = String::from("Timeout reached after");
        for (value, unit) in [
            (self.hours, "hour(s)"),
            (self.minutes, "minute(s)"),
            (self.seconds, "second(s)"),
        ] {
            if let Some(value) = value {
                message.push_str(&format!(" {value} {unit}"));
            }
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_add_up() {
        let limit = TimeLimit::hours(5).and_minutes(5).and_seconds(5);
        assert_eq!(limit.total_seconds(), 5 * 3600 + 5 * 60 + 5);
        assert_eq!(
            limit.describe(),
            "Timeout reached after 5 hour(s) 5 minute(s) 5 second(s)"
        );
    }

    #[test]
    fn test_unlimited() {
        assert!(TimeLimit::unlimited().is_unlimited());
        assert!(TimeLimit::seconds(0).is_unlimited());
        assert!(TimeLimit::from_duration(Duration::ZERO).is_unlimited());
        assert!(!TimeLimit::seconds(1).is_unlimited());
    }

    #[test]
    fn test_message_template() {
        let limit = TimeLimit::minutes(2)
            .and_seconds(3)
            .message("gave up after {total_seconds}s ({minutes}m {seconds}s, {hours}h)");
        assert_eq!(limit.describe(), "gave up after 123s (2m 3s, 0h)");
    }

    #[test]
    fn test_huge_limits_saturate() {
        assert_eq!(TimeLimit::hours(u64::MAX / 1000).total_seconds(), u64::MAX);
        assert_eq!(
            TimeLimit::minutes(u64::MAX).and_seconds(u64::MAX).total_seconds(),
            u64::MAX
        );
        assert_eq!(TimeLimit::from_duration(Duration::MAX).total_seconds(), u64::MAX);
        assert!(!TimeLimit::hours(u64::MAX).is_unlimited());
    }

    #[test]
    fn test_from_duration_rounds_up() {
        assert_eq!(TimeLimit::from_duration(Duration::from_millis(1200)).total_seconds(), 2);
        assert_eq!(TimeLimit::from_duration(Duration::from_secs(90)).total_seconds(), 90);
    }
}
