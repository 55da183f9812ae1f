//! Verdict Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer, plus the outer pieces a test suite needs: response
//! capture, suite loading, settings and log setup.

pub mod adapters;
pub mod config;
pub mod logging;
pub mod serialization;
pub mod testing;

use std::sync::Arc;

use verdict_application::ResponseAssertions;
use verdict_domain::{AssertionSettings, Response};

pub use adapters::{CaptureError, SystemClock, capture_response};
pub use config::{SettingsError, settings_from_env, settings_from_lookup};
pub use logging::init_logging;
pub use serialization::{
    SerializationError, SuiteFormat, from_json, from_yaml, load_suite, parse_suite,
    to_json_stable,
};
pub use testing::TestRunner;

/// Wraps a response for assertions using the system clock and default settings.
#[must_use]
pub fn expect_response(response: Response) -> ResponseAssertions {
    ResponseAssertions::new(response, Arc::new(SystemClock::new()))
}

/// Wraps a response for assertions using the system clock and `settings`.
#[must_use]
pub fn expect_response_with(response: Response, settings: AssertionSettings) -> ResponseAssertions {
    ResponseAssertions::with_settings(response, Arc::new(SystemClock::new()), settings)
}
