//! Settings from the environment.
//!
//! Reads overrides for [`AssertionSettings`] from `VERDICT_*` variables on
//! top of the defaults.

use verdict_domain::AssertionSettings;

/// Tolerance for timestamp checks, in milliseconds.
pub const ENV_TIMESTAMP_TOLERANCE_MS: &str = "VERDICT_TIMESTAMP_TOLERANCE_MS";
/// Body field read by the body timestamp check.
pub const ENV_TIMESTAMP_FIELD: &str = "VERDICT_TIMESTAMP_FIELD";
/// Whether wrapped responses log their body (`true`/`false`, `1`/`0`).
pub const ENV_LOG_RESPONSE_BODY: &str = "VERDICT_LOG_RESPONSE_BODY";

/// Errors from reading settings.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A variable is set to something that does not parse.
    #[error("invalid value '{value}' for {name}: expected {expected}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// What the value should look like.
        expected: &'static str,
    },
}

/// Loads settings from the process environment.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidValue`] if a variable is set but does not
/// parse.
pub fn settings_from_env() -> Result<AssertionSettings, SettingsError> {
    settings_from_lookup(|name| std::env::var(name).ok())
}

/// Loads settings from an arbitrary variable lookup.
///
/// Unset variables keep their defaults.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidValue`] if a variable is set but does not
/// parse.
pub fn settings_from_lookup<F>(lookup: F) -> Result<AssertionSettings, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = AssertionSettings::default();

    if let Some(value) = lookup(ENV_TIMESTAMP_TOLERANCE_MS) {
        settings.timestamp_tolerance_ms =
            value.trim().parse().map_err(|_| SettingsError::InvalidValue {
                name: ENV_TIMESTAMP_TOLERANCE_MS,
                value: value.clone(),
                expected: "a whole number of milliseconds",
            })?;
    }

    if let Some(value) = lookup(ENV_TIMESTAMP_FIELD) {
        let field = value.trim();
        if field.is_empty() {
            return Err(SettingsError::InvalidValue {
                name: ENV_TIMESTAMP_FIELD,
                value,
                expected: "a property path",
            });
        }
        settings.timestamp_field = field.to_string();
    }

    if let Some(value) = lookup(ENV_LOG_RESPONSE_BODY) {
        settings.log_response_body = match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => {
                return Err(SettingsError::InvalidValue {
                    name: ENV_LOG_RESPONSE_BODY,
                    value,
                    expected: "true or false",
                });
            }
        };
    }

    Ok(settings)
}
