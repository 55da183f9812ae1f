//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io;
use std::path::PathBuf;

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// YAML deserialization failed.
    #[error("YAML deserialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The file extension does not name a known suite format.
    #[error("unsupported suite file: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Serializes a value to deterministic JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

/// Deserializes YAML from a string.
///
/// # Errors
///
/// Returns an error if the YAML is invalid or doesn't match the expected type.
pub fn from_yaml<T: DeserializeOwned>(yaml: &str) -> Result<T, SerializationError> {
    Ok(serde_yaml::from_str(yaml)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use verdict_domain::{Assertion, AssertionResult, StatusExpectation, TestResults};

    fn sample_results() -> TestResults {
        TestResults::new(
            "smoke",
            vec![AssertionResult::pass(Assertion::StatusCode {
                expected: StatusExpectation::exact(200),
            })],
            3,
        )
    }

    #[test]
    fn test_stable_serialization_has_trailing_newline() {
        let json = to_json_stable(&sample_results()).expect("serialization should work");
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn test_stable_serialization_uses_two_space_indent() {
        let json = to_json_stable(&sample_results()).expect("serialization should work");
        assert!(json.contains("\n  \"suite_name\": \"smoke\""));
    }

    #[test]
    fn test_results_roundtrip() {
        let original = sample_results();
        let json = to_json_stable(&original).expect("serialization should work");
        let restored: TestResults = from_json(&json).expect("deserialization should work");
        assert_eq!(original, restored);
    }

    #[test]
    fn test_from_json_reports_errors() {
        let result: Result<TestResults, _> = from_json(r#"{"suite_name": }"#);
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }

    #[test]
    fn test_from_yaml() {
        let assertion: Assertion =
            from_yaml("type: property_exists\npath: user.id\n").expect("valid yaml");
        assert_eq!(
            assertion,
            Assertion::PropertyExists {
                path: "user.id".to_string()
            }
        );
    }
}
