//! Loading declarative suites from JSON or YAML.

use std::path::Path;

use verdict_domain::TestSuite;

use super::json::{SerializationError, from_json, from_yaml};

/// Text format of a suite file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl SuiteFormat {
    /// Picks the format from a file extension (`json`, `yaml`, `yml`).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parses a suite from text.
///
/// # Errors
///
/// Returns an error if the text is not a valid suite in `format`.
pub fn parse_suite(text: &str, format: SuiteFormat) -> Result<TestSuite, SerializationError> {
    match format {
        SuiteFormat::Json => from_json(text),
        SuiteFormat::Yaml => from_yaml(text),
    }
}

/// Reads and parses a suite file, choosing the format by extension.
///
/// # Errors
///
/// Returns an error if the extension is unknown, the file cannot be read,
/// or its content is not a valid suite.
pub fn load_suite(path: &Path) -> Result<TestSuite, SerializationError> {
    let format = SuiteFormat::from_path(path)
        .ok_or_else(|| SerializationError::UnsupportedFormat(path.to_path_buf()))?;
    let text = std::fs::read_to_string(path)?;
    let suite = parse_suite(&text, format)?;
    tracing::debug!(
        target: "verdict",
        path = %path.display(),
        assertions = suite.len(),
        "loaded suite"
    );
    Ok(suite)
}
