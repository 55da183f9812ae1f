//! Declarative response checks.
//!
//! This module provides serializable descriptions of response assertions,
//! grouped into suites, and the results of running them.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use uuid::Uuid;

use crate::value::JsonType;

/// A check to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check the value at a property path.
    PropertyValue {
        /// Property path into the body.
        path: String,
        /// Expected value.
        expected: Value,
    },
    /// Check the body contains an expected subset.
    BodyContains {
        /// Expected subset of the body.
        expected: Value,
    },
    /// Check a property includes a substring, element or entries.
    PropertyIncludes {
        /// Property path into the body.
        path: String,
        /// Value that must be included.
        value: Value,
    },
    /// Check a numeric property is greater than a bound.
    PropertyGreaterThan {
        /// Property path into the body.
        path: String,
        /// Exclusive lower bound.
        value: Number,
    },
    /// Check a numeric property is less than a bound.
    PropertyLessThan {
        /// Property path into the body.
        path: String,
        /// Exclusive upper bound.
        value: Number,
    },
    /// Check the JSON type of a property.
    PropertyType {
        /// Property path into the body.
        path: String,
        /// Expected type.
        expected: JsonType,
    },
    /// Check a property is present and not null.
    PropertyExists {
        /// Property path into the body.
        path: String,
    },
    /// Check a property is not present at all.
    PropertyAbsent {
        /// Property path into the body.
        path: String,
    },
    /// Check every element of an array has the given keys.
    KeysInArray {
        /// Property path to the array.
        path: String,
        /// Keys each element must have.
        keys: Vec<String>,
    },
    /// Check a body timestamp is close to now.
    TimestampRecent {
        /// Property path to the timestamp (settings default when absent).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        /// Allowed drift in milliseconds (settings default when absent).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tolerance_ms: Option<u64>,
    },
    /// Check a string property matches a regex pattern.
    PropertyMatches {
        /// Property path into the body.
        path: String,
        /// Regex pattern.
        pattern: String,
    },
}

impl Assertion {
    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::PropertyValue { path, expected } => format!("'{path}' equals {expected}"),
            Self::BodyContains { expected } => format!("Body contains {expected}"),
            Self::PropertyIncludes { path, value } => format!("'{path}' includes {value}"),
            Self::PropertyGreaterThan { path, value } => format!("'{path}' > {value}"),
            Self::PropertyLessThan { path, value } => format!("'{path}' < {value}"),
            Self::PropertyType { path, expected } => format!("'{path}' is {expected}"),
            Self::PropertyExists { path } => format!("'{path}' exists"),
            Self::PropertyAbsent { path } => format!("'{path}' is absent"),
            Self::KeysInArray { path, keys } => {
                format!("Each item in '{path}' has keys [{}]", keys.join(", "))
            }
            Self::TimestampRecent { path, tolerance_ms } => {
                let field = path.as_deref().unwrap_or("timestamp");
                match tolerance_ms {
                    Some(ms) => format!("'{field}' within {ms}ms of now"),
                    None => format!("'{field}' is recent"),
                }
            }
            Self::PropertyMatches { path, pattern } => format!("'{path}' matches /{pattern}/"),
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }
}

/// A named list of assertions.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TestSuite {
    /// Unique identifier.
    #[serde(default = "generate_id")]
    pub id: Uuid,
    /// Test suite name.
    pub name: String,
    /// Assertions to run.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
    /// Whether to stop on first failure.
    #[serde(default)]
    pub stop_on_failure: bool,
}

fn generate_id() -> Uuid {
    Uuid::now_v7()
}

impl TestSuite {
    /// Create a new empty test suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            assertions: Vec::new(),
            stop_on_failure: false,
        }
    }

    /// Add an assertion to the suite.
    pub fn add(&mut self, assertion: Assertion) {
        self.assertions.push(assertion);
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Stop at the first failing assertion (builder pattern).
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Check if the suite is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Get the number of assertions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assertions.len()
    }
}

/// Results from running a test suite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResults {
    /// Test suite that was run.
    pub suite_name: String,
    /// Individual assertion results.
    pub results: Vec<AssertionResult>,
    /// Total number of assertions run.
    pub total: usize,
    /// Number of passed assertions.
    pub passed: usize,
    /// Number of failed assertions.
    pub failed: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(
        suite_name: impl Into<String>,
        results: Vec<AssertionResult>,
        duration_ms: u64,
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;

        Self {
            suite_name: suite_name.into(),
            results,
            total,
            passed,
            failed,
            duration_ms,
        }
    }

    /// Check if all tests passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Iterates over the failed results.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_expectation_exact() {
        let exp = StatusExpectation::exact(200);
        assert!(exp.matches(200));
        assert!(!exp.matches(201));
    }

    #[test]
    fn test_status_expectation_range() {
        let exp = StatusExpectation::success();
        assert!(exp.matches(200));
        assert!(exp.matches(299));
        assert!(!exp.matches(300));
        assert!(!exp.matches(199));
    }

    #[test]
    fn test_status_expectation_one_of() {
        let exp = StatusExpectation::OneOf(vec![200, 201, 204]);
        assert!(exp.matches(204));
        assert!(!exp.matches(202));
        assert_eq!(exp.description(), "in [200, 201, 204]");
    }

    #[test]
    fn test_assertion_description() {
        let assertion = Assertion::StatusCode {
            expected: StatusExpectation::exact(200),
        };
        assert_eq!(assertion.description(), "Status code = 200");

        let assertion = Assertion::KeysInArray {
            path: "items".to_string(),
            keys: vec!["id".to_string(), "name".to_string()],
        };
        assert_eq!(assertion.description(), "Each item in 'items' has keys [id, name]");

        let assertion = Assertion::TimestampRecent {
            path: None,
            tolerance_ms: Some(1000),
        };
        assert_eq!(assertion.description(), "'timestamp' within 1000ms of now");

        let assertion = Assertion::PropertyGreaterThan {
            path: "id".to_string(),
            value: Number::from(9_007_199_254_740_993_u64),
        };
        assert_eq!(assertion.description(), "'id' > 9007199254740993");
    }

    #[test]
    fn test_numeric_bound_keeps_integer_precision() {
        let assertion: Assertion = serde_json::from_value(json!({
            "type": "property_less_than",
            "path": "id",
            "value": 9_007_199_254_740_993_u64
        }))
        .expect("valid assertion");
        assert_eq!(
            assertion,
            Assertion::PropertyLessThan {
                path: "id".to_string(),
                value: Number::from(9_007_199_254_740_993_u64),
            }
        );

        let assertion: Assertion =
            serde_json::from_value(json!({"type": "property_absent", "path": "deletedAt"}))
                .expect("valid assertion");
        assert_eq!(assertion.description(), "'deletedAt' is absent");
    }

    #[test]
    fn test_assertion_deserialize_tagged() {
        let assertion: Assertion = serde_json::from_value(json!({
            "type": "property_type",
            "path": "user.tags",
            "expected": "array"
        }))
        .expect("valid assertion");
        assert_eq!(
            assertion,
            Assertion::PropertyType {
                path: "user.tags".to_string(),
                expected: JsonType::Array,
            }
        );

        let assertion: Assertion =
            serde_json::from_value(json!({"type": "status_code", "expected": {"min": 200, "max": 204}}))
                .expect("valid assertion");
        assert_eq!(
            assertion,
            Assertion::StatusCode {
                expected: StatusExpectation::Range { min: 200, max: 204 }
            }
        );
    }

    #[test]
    fn test_timestamp_recent_defaults() {
        let assertion: Assertion =
            serde_json::from_value(json!({"type": "timestamp_recent"})).expect("valid assertion");
        assert_eq!(
            assertion,
            Assertion::TimestampRecent {
                path: None,
                tolerance_ms: None
            }
        );
    }

    #[test]
    fn test_test_suite_builder() {
        let suite = TestSuite::new("API Tests")
            .with_assertion(Assertion::StatusCode {
                expected: StatusExpectation::success(),
            })
            .with_assertion(Assertion::PropertyExists {
                path: "id".to_string(),
            })
            .with_stop_on_failure(true);

        assert_eq!(suite.name, "API Tests");
        assert_eq!(suite.len(), 2);
        assert!(suite.stop_on_failure);
    }

    #[test]
    fn test_test_results() {
        let results = vec![
            AssertionResult::pass(Assertion::StatusCode {
                expected: StatusExpectation::exact(200),
            }),
            AssertionResult::fail_with_value(
                Assertion::PropertyExists {
                    path: "id".to_string(),
                },
                "undefined",
                "missing",
            ),
        ];

        let test_results = TestResults::new("Suite", results, 100);
        assert_eq!(test_results.total, 2);
        assert_eq!(test_results.passed, 1);
        assert_eq!(test_results.failed, 1);
        assert!(!test_results.all_passed());
        assert!((test_results.pass_rate() - 50.0).abs() < f64::EPSILON);
        assert_eq!(test_results.failures().count(), 1);
    }
}
