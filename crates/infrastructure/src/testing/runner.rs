//! Test runner implementation.
//!
//! Executes declarative assertions through `ResponseAssertions` and
//! collects per-assertion results instead of stopping at the first error.

use std::time::{Duration, Instant};

use serde_json::Value;
use verdict_application::ResponseAssertions;
use verdict_domain::{Assertion, AssertionResult, CheckResult, TestResults, TestSuite};

/// Test runner that executes assertions against responses.
#[derive(Debug, Default)]
pub struct TestRunner {
    /// Whether to stop on first failure.
    stop_on_failure: bool,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: false,
        }
    }

    /// Set whether to stop on first failure.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Run a test suite against a wrapped response.
    #[must_use]
    pub fn run(&self, suite: &TestSuite, response: &ResponseAssertions) -> TestResults {
        let start = Instant::now();
        let mut results = Vec::with_capacity(suite.assertions.len());

        for assertion in &suite.assertions {
            let result = self.run_assertion(assertion, response);
            let failed = !result.passed;
            results.push(result);

            if failed && (self.stop_on_failure || suite.stop_on_failure) {
                break;
            }
        }

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let results = TestResults::new(&suite.name, results, duration_ms);
        tracing::info!(
            target: "verdict",
            suite = %suite.name,
            passed = results.passed,
            failed = results.failed,
            "suite finished"
        );
        results
    }

    /// Run a single assertion against a wrapped response.
    #[must_use]
    pub fn run_assertion(
        &self,
        assertion: &Assertion,
        response: &ResponseAssertions,
    ) -> AssertionResult {
        match Self::check(assertion, response) {
            Ok(()) => AssertionResult::pass(assertion.clone()),
            Err(error) => {
                AssertionResult::fail_with_value(assertion.clone(), error.actual(), error.message())
            }
        }
    }

    fn check(assertion: &Assertion, response: &ResponseAssertions) -> CheckResult {
        match assertion {
            Assertion::StatusCode { expected } => response.verify_status_matches(expected),
            Assertion::PropertyValue { path, expected } => {
                response.verify_property_value(path, expected.clone())
            }
            Assertion::BodyContains { expected } => {
                response.check_that_body_contains(expected.clone())
            }
            Assertion::PropertyIncludes { path, value } => {
                response.verify_property_includes(path, value.clone())
            }
            Assertion::PropertyGreaterThan { path, value } => {
                response.verify_property_greater_than(path, Value::Number(value.clone()))
            }
            Assertion::PropertyLessThan { path, value } => {
                response.verify_property_less_than(path, Value::Number(value.clone()))
            }
            Assertion::PropertyType { path, expected } => {
                response.verify_property_type(path, *expected)
            }
            Assertion::PropertyExists { path } => response.verify_property_exists(path),
            Assertion::PropertyAbsent { path } => response.verify_property_absent(path),
            Assertion::KeysInArray { path, keys } => {
                response.verify_keys_in_array(path, keys.as_slice())
            }
            Assertion::TimestampRecent { path, tolerance_ms } => {
                let settings = response.settings();
                let field = path.as_deref().unwrap_or(&settings.timestamp_field);
                let tolerance = tolerance_ms
                    .map_or_else(|| settings.timestamp_tolerance(), Duration::from_millis);
                response.verify_property_timestamp_within(field, tolerance)
            }
            Assertion::PropertyMatches { path, pattern } => {
                response.verify_property_matches(path, pattern)
            }
        }
    }
}
