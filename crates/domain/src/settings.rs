//! Assertion settings
//!
//! Defaults used by the response assertions where a call does not say
//! otherwise.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default tolerance for timestamp freshness checks, in milliseconds.
pub const DEFAULT_TIMESTAMP_TOLERANCE_MS: u64 = 5000;

/// Default body field read by the body timestamp check.
pub const DEFAULT_TIMESTAMP_FIELD: &str = "timestamp";

/// Settings for response assertions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertionSettings {
    /// Allowed drift between a timestamp and now, in milliseconds.
    pub timestamp_tolerance_ms: u64,
    /// Body property path holding the timestamp for body freshness checks.
    pub timestamp_field: String,
    /// Whether the full body is logged when a response is wrapped.
    pub log_response_body: bool,
}

impl Default for AssertionSettings {
    fn default() -> Self {
        Self {
            timestamp_tolerance_ms: DEFAULT_TIMESTAMP_TOLERANCE_MS,
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
            log_response_body: true,
        }
    }
}

impl AssertionSettings {
    /// Returns the timestamp tolerance as a `Duration`.
    #[must_use]
    pub const fn timestamp_tolerance(&self) -> Duration {
        Duration::from_millis(self.timestamp_tolerance_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AssertionSettings::default();
        assert_eq!(settings.timestamp_tolerance(), Duration::from_secs(5));
        assert_eq!(settings.timestamp_field, "timestamp");
        assert!(settings.log_response_body);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let settings: AssertionSettings =
            serde_json::from_str(r#"{"timestamp_field": "createdAt"}"#).expect("valid settings");
        assert_eq!(settings.timestamp_field, "createdAt");
        assert_eq!(settings.timestamp_tolerance_ms, DEFAULT_TIMESTAMP_TOLERANCE_MS);
    }
}
