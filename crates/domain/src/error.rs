//! Assertion failure type

use thiserror::Error;

/// A failed response assertion.
///
/// There is a single failure kind; the message describes what was expected
/// and what was found.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionError {
    message: String,
    expected: String,
    actual: String,
}

impl AssertionError {
    /// Creates a failure from a message and the rendered expected/actual values.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the rendered expected value.
    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Returns the rendered actual value.
    #[must_use]
    pub fn actual(&self) -> &str {
        &self.actual
    }
}

/// Result type alias for a single check.
pub type CheckResult = Result<(), AssertionError>;
