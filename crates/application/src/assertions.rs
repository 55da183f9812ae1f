//! Named assertions over a single HTTP response.
//!
//! Every check resolves a value (the status, or a property path into the
//! body), logs what it is about to compare, evaluates the predicate and
//! returns an [`AssertionError`] describing expected vs. actual on failure.
//! Checks do not mutate anything, so repeating one gives the same outcome.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use regex::Regex;
use serde_json::Value;
use verdict_domain::{
    AssertionError, AssertionSettings, CheckResult, JsonType, PropertyPath, Response,
    StatusExpectation, compare_numbers, display_value, drift, find_subset_mismatch,
    parse_timestamp, values_equal,
};

use crate::observe::{LOG_TARGET, run_observed};
use crate::ports::Clock;

/// Assertions over a wrapped response.
///
/// Wrapping a response logs its status and body once.
pub struct ResponseAssertions {
    response: Response,
    settings: AssertionSettings,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for ResponseAssertions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseAssertions")
            .field("response", &self.response)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ResponseAssertions {
    /// Wraps a response with default settings.
    #[must_use]
    pub fn new(response: Response, clock: Arc<dyn Clock>) -> Self {
        Self::with_settings(response, clock, AssertionSettings::default())
    }

    /// Wraps a response with explicit settings.
    #[must_use]
    pub fn with_settings(
        response: Response,
        clock: Arc<dyn Clock>,
        settings: AssertionSettings,
    ) -> Self {
        let assertions = Self {
            response,
            settings,
            clock,
        };
        assertions.log_response();
        assertions
    }

    /// Returns the wrapped response.
    #[must_use]
    pub const fn response(&self) -> &Response {
        &self.response
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> &AssertionSettings {
        &self.settings
    }

    fn log_response(&self) {
        let status = self.response.status();
        if self.settings.log_response_body {
            tracing::info!(
                target: LOG_TARGET,
                "---RESPONSE---\nStatus: {status}\nBody: {}",
                self.response.pretty_body()
            );
        } else {
            tracing::info!(target: LOG_TARGET, "---RESPONSE---\nStatus: {status}");
        }
    }

    /// Body value at `path`; unparseable paths are absent.
    fn lookup(&self, path: &str) -> Option<&Value> {
        match PropertyPath::parse(path) {
            Ok(parsed) => self.response.get(&parsed),
            Err(error) => {
                tracing::warn!(target: LOG_TARGET, %error, "treating property path as absent");
                None
            }
        }
    }

    /// Checks the status code equals `expected`.
    ///
    /// # Errors
    ///
    /// Fails when the status differs.
    pub fn verify_status(&self, expected: u16) -> CheckResult {
        let actual = self.response.status();
        let message = format!("Comparing actual status: '{actual}' to expected: '{expected}'");

        run_observed(&message, || {
            if actual == expected {
                Ok(())
            } else {
                Err(AssertionError::new(
                    format!("expected status {expected} but got {actual}"),
                    expected.to_string(),
                    actual.to_string(),
                ))
            }
        })
    }

    /// Checks the status code against an exact code, range or set.
    ///
    /// # Errors
    ///
    /// Fails when the status does not match.
    pub fn verify_status_matches(&self, expected: &StatusExpectation) -> CheckResult {
        let actual = self.response.status();
        let description = expected.description();
        let message = format!("Comparing actual status: '{actual}' to expected: {description}");

        run_observed(&message, || {
            if expected.matches(actual) {
                Ok(())
            } else {
                Err(AssertionError::new(
                    format!("expected status {description} but got {actual}"),
                    description.clone(),
                    actual.to_string(),
                ))
            }
        })
    }

    /// Checks the value at `path` equals `expected`.
    ///
    /// Numbers compare by value. An absent property never equals anything,
    /// not even `null`.
    ///
    /// # Errors
    ///
    /// Fails when the values differ or the property is absent.
    pub fn verify_property_value(&self, path: &str, expected: impl Into<Value>) -> CheckResult {
        let expected = expected.into();
        let actual = self.lookup(path);
        let message = format!(
            "Verifying that property '{path}' has value '{}', actual: '{}'",
            display_value(Some(&expected)),
            display_value(actual)
        );

        run_observed(&message, || {
            if actual.is_some_and(|value| values_equal(value, &expected)) {
                Ok(())
            } else {
                Err(AssertionError::new(
                    format!(
                        "expected '{path}' to equal {expected} but got {}",
                        render(actual)
                    ),
                    expected.to_string(),
                    render(actual),
                ))
            }
        })
    }

    /// Checks the body contains `expected` as a structural subset.
    ///
    /// # Errors
    ///
    /// Fails at the first missing key or differing value.
    pub fn check_that_body_contains(&self, expected: impl Into<Value>) -> CheckResult {
        let expected = expected.into();
        let actual = self.response.body();
        let message = format!(
            "Checking if response body includes expected object\n  actual: {}\n  expected: {}",
            pretty(actual),
            pretty(&expected)
        );

        run_observed(&message, || match find_subset_mismatch(actual, &expected) {
            None => Ok(()),
            Some(mismatch) => Err(AssertionError::new(
                format!("expected response body to contain subset: {mismatch}"),
                expected.to_string(),
                actual.to_string(),
            )),
        })
    }

    /// Checks the value at `path` includes `needle`.
    ///
    /// Strings include substrings, arrays include equal elements and objects
    /// include all entries of an object needle.
    ///
    /// # Errors
    ///
    /// Fails when the needle is missing or the value cannot contain it.
    pub fn verify_property_includes(&self, path: &str, needle: impl Into<Value>) -> CheckResult {
        let needle = needle.into();
        let actual = self.lookup(path);
        let message = format!(
            "Checking if '{path}' includes '{}'",
            display_value(Some(&needle))
        );

        run_observed(&message, || match includes(actual, &needle) {
            Some(true) => Ok(()),
            Some(false) => Err(AssertionError::new(
                format!("expected '{path}' ({}) to include {needle}", render(actual)),
                needle.to_string(),
                render(actual),
            )),
            None => Err(AssertionError::new(
                format!(
                    "expected '{path}' to be a string, array or object that can include {needle} but got {}",
                    type_name(actual)
                ),
                needle.to_string(),
                render(actual),
            )),
        })
    }

    /// Checks the number at `path` is greater than `bound`.
    ///
    /// Any integer or float converts into a bound. Two integers compare
    /// exactly, whatever their size.
    ///
    /// # Errors
    ///
    /// Fails when the value is not a number or not greater, or when `bound`
    /// is not a number.
    pub fn verify_property_greater_than(
        &self,
        path: &str,
        bound: impl Into<Value>,
    ) -> CheckResult {
        let bound = bound.into();
        let actual = self.lookup(path);
        let message = format!("Checking if '{path}' ({}) > {bound}", display_value(actual));

        run_observed(&message, || {
            compare_number(path, actual, &bound, "greater than", Ordering::Greater)
        })
    }

    /// Checks the number at `path` is less than `bound`.
    ///
    /// # Errors
    ///
    /// Fails when the value is not a number or not less, or when `bound` is
    /// not a number.
    pub fn verify_property_less_than(&self, path: &str, bound: impl Into<Value>) -> CheckResult {
        let bound = bound.into();
        let actual = self.lookup(path);
        let message = format!("Checking that '{path}' ({}) < {bound}", display_value(actual));

        run_observed(&message, || {
            compare_number(path, actual, &bound, "less than", Ordering::Less)
        })
    }

    /// Checks the JSON type of the value at `path`.
    ///
    /// An absent property has no type and always fails here; use
    /// [`Self::verify_property_absent`] to assert that a property is missing.
    ///
    /// # Errors
    ///
    /// Fails when the type differs or the property is absent.
    pub fn verify_property_type(&self, path: &str, expected: JsonType) -> CheckResult {
        let actual = self.lookup(path);
        let message = format!("Checking type of '{path}' is '{expected}'");

        run_observed(&message, || {
            if actual.map(JsonType::of) == Some(expected) {
                Ok(())
            } else {
                Err(AssertionError::new(
                    format!(
                        "expected '{path}' to be of type {expected} but got {}",
                        type_name(actual)
                    ),
                    expected.name(),
                    type_name(actual),
                ))
            }
        })
    }

    /// Checks the property at `path` is present and not null.
    ///
    /// # Errors
    ///
    /// Fails when the property is absent or null.
    pub fn verify_property_exists(&self, path: &str) -> CheckResult {
        let actual = self.lookup(path);
        let message = format!("Checking that property '{path}' exists in the response");

        run_observed(&message, || match actual {
            None => Err(AssertionError::new(
                format!("expected '{path}' to exist but it is undefined"),
                "a value",
                "undefined",
            )),
            Some(Value::Null) => Err(AssertionError::new(
                format!("expected '{path}' to exist but it is null"),
                "a value",
                "null",
            )),
            Some(_) => Ok(()),
        })
    }

    /// Checks nothing is present at `path`.
    ///
    /// A property set to `null` is present.
    ///
    /// # Errors
    ///
    /// Fails when the property resolves to any value, `null` included.
    pub fn verify_property_absent(&self, path: &str) -> CheckResult {
        let actual = self.lookup(path);
        let message = format!("Checking that property '{path}' is absent from the response");

        run_observed(&message, || match actual {
            None => Ok(()),
            Some(value) => Err(AssertionError::new(
                format!("expected '{path}' to be undefined but got {value}"),
                "undefined",
                value.to_string(),
            )),
        })
    }

    /// Checks every element of the array at `path` has every key in `keys`.
    ///
    /// An empty array passes.
    ///
    /// # Errors
    ///
    /// Fails when the value is not an array, or an element is not an object
    /// or lacks a key.
    pub fn verify_keys_in_array<S: AsRef<str>>(&self, path: &str, keys: &[S]) -> CheckResult {
        let keys: Vec<&str> = keys.iter().map(AsRef::as_ref).collect();
        let actual = self.lookup(path);
        let message = format!(
            "Checking that each item in '{path}' contains keys: [{}]",
            keys.join(", ")
        );

        run_observed(&message, || {
            let Some(Value::Array(items)) = actual else {
                return Err(AssertionError::new(
                    format!("expected '{path}' to be an array but got {}", type_name(actual)),
                    "array",
                    type_name(actual),
                ));
            };

            for (index, item) in items.iter().enumerate() {
                let Value::Object(entries) = item else {
                    return Err(AssertionError::new(
                        format!(
                            "expected '{path}[{index}]' to be an object but got {}",
                            JsonType::of(item)
                        ),
                        "object",
                        JsonType::of(item).name(),
                    ));
                };
                if let Some(missing) = keys.iter().find(|key| !entries.contains_key(**key)) {
                    return Err(AssertionError::new(
                        format!("expected '{path}[{index}]' to have property '{missing}'"),
                        format!("[{}]", keys.join(", ")),
                        item.to_string(),
                    ));
                }
            }
            Ok(())
        })
    }

    /// Checks the string at `path` matches the regex `pattern`.
    ///
    /// # Errors
    ///
    /// Fails when the pattern is invalid, the value is not a string, or it
    /// does not match.
    pub fn verify_property_matches(&self, path: &str, pattern: &str) -> CheckResult {
        let actual = self.lookup(path);
        let message = format!("Checking that '{path}' ({}) matches /{pattern}/", display_value(actual));

        run_observed(&message, || {
            let regex = Regex::new(pattern).map_err(|e| {
                AssertionError::new(
                    format!("invalid regex pattern '{pattern}': {e}"),
                    pattern,
                    render(actual),
                )
            })?;
            match actual {
                Some(Value::String(text)) if regex.is_match(text) => Ok(()),
                Some(Value::String(text)) => Err(AssertionError::new(
                    format!("expected '{path}' ('{text}') to match /{pattern}/"),
                    pattern,
                    text.as_str(),
                )),
                _ => Err(AssertionError::new(
                    format!("expected '{path}' to be a string but got {}", type_name(actual)),
                    pattern,
                    render(actual),
                )),
            }
        })
    }

    /// Checks the body's timestamp field (from settings) is within the
    /// default tolerance of now.
    ///
    /// # Errors
    ///
    /// Fails when the field is absent, unparseable or too far from now.
    pub fn verify_timestamp_is_recent(&self) -> CheckResult {
        let field = self.settings.timestamp_field.clone();
        self.verify_property_timestamp_within(&field, self.settings.timestamp_tolerance())
    }

    /// Checks the timestamp at `path` is within `tolerance` of now.
    ///
    /// # Errors
    ///
    /// Fails when the property is absent, unparseable or too far from now.
    pub fn verify_property_timestamp_within(&self, path: &str, tolerance: Duration) -> CheckResult {
        let actual = self.lookup(path).cloned();
        self.check_recent(&format!("'{path}'"), actual.as_ref(), tolerance)
    }

    /// Checks a caller-supplied timestamp is within the default tolerance of
    /// now.
    ///
    /// Strings are parsed as dates, numbers as epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Fails when the timestamp is unparseable or too far from now.
    pub fn expect_timestamp_to_be_recent(&self, timestamp: impl Into<Value>) -> CheckResult {
        self.expect_timestamp_within(timestamp, self.settings.timestamp_tolerance())
    }

    /// Checks a caller-supplied timestamp is within `tolerance` of now.
    ///
    /// # Errors
    ///
    /// Fails when the timestamp is unparseable or too far from now.
    pub fn expect_timestamp_within(
        &self,
        timestamp: impl Into<Value>,
        tolerance: Duration,
    ) -> CheckResult {
        let timestamp = timestamp.into();
        self.check_recent("timestamp", Some(&timestamp), tolerance)
    }

    fn check_recent(&self, label: &str, raw: Option<&Value>, tolerance: Duration) -> CheckResult {
        let tolerance_ms = tolerance.as_millis();
        let message = format!(
            "Checking that {label} ({}) is within {tolerance_ms}ms of now",
            display_value(raw)
        );

        run_observed(&message, || {
            let Some(parsed) = raw.and_then(parse_timestamp) else {
                return Err(AssertionError::new(
                    format!("expected {label} to be a timestamp but got {}", render(raw)),
                    "timestamp",
                    render(raw),
                ));
            };

            let now = self.clock.now();
            let distance = drift(now, parsed);
            let allowed = TimeDelta::from_std(tolerance).unwrap_or(TimeDelta::MAX);
            if distance <= allowed {
                Ok(())
            } else {
                Err(AssertionError::new(
                    format!(
                        "Expected timestamp \"{}\" to be within {tolerance_ms}ms of now (off by {}ms)",
                        display_value(raw),
                        distance.num_milliseconds()
                    ),
                    now.to_rfc3339(),
                    parsed.to_rfc3339(),
                ))
            }
        })
    }
}

/// JSON rendering of a possibly absent value.
fn render(value: Option<&Value>) -> String {
    value.map_or_else(|| "undefined".to_string(), ToString::to_string)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn type_name(value: Option<&Value>) -> &'static str {
    value.map_or("undefined", |v| JsonType::of(v).name())
}

/// `None` when `actual` cannot contain `needle` at all.
fn includes(actual: Option<&Value>, needle: &Value) -> Option<bool> {
    match (actual?, needle) {
        (Value::String(text), Value::String(part)) => Some(text.contains(part.as_str())),
        (Value::Array(items), _) => Some(items.iter().any(|item| values_equal(item, needle))),
        (Value::Object(entries), Value::Object(wanted)) => Some(wanted.iter().all(|(key, value)| {
            entries
                .get(key)
                .is_some_and(|actual| values_equal(actual, value))
        })),
        _ => None,
    }
}

fn compare_number(
    path: &str,
    actual: Option<&Value>,
    bound: &Value,
    relation: &str,
    wanted: Ordering,
) -> CheckResult {
    let Value::Number(bound) = bound else {
        return Err(AssertionError::new(
            format!("expected a numeric bound for '{path}' but got {bound}"),
            format!("{relation} {bound}"),
            render(actual),
        ));
    };
    match actual {
        Some(Value::Number(number)) if compare_numbers(number, bound) == Some(wanted) => Ok(()),
        Some(Value::Number(number)) => Err(AssertionError::new(
            format!("expected '{path}' ({number}) to be {relation} {bound}"),
            format!("{relation} {bound}"),
            number.to_string(),
        )),
        _ => Err(AssertionError::new(
            format!("expected '{path}' to be a number but got {}", render(actual)),
            format!("{relation} {bound}"),
            render(actual),
        )),
    }
}
