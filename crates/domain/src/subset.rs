//! Structural subset matching.
//!
//! `expected` is a subset of `actual` when every key of an expected mapping
//! is present in the actual mapping with a matching value (recursively),
//! every element of an expected sequence matches some element of the actual
//! sequence, and scalars are equal. Extra actual keys and elements are
//! ignored.

use std::fmt;

use serde_json::Value;

use crate::value::{JsonType, values_equal};

/// First place where a subset match failed.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetMismatch {
    /// Location of the mismatch, in property path notation (empty for root).
    pub path: String,
    /// What went wrong there.
    pub kind: MismatchKind,
}

/// Kind of subset mismatch.
#[derive(Debug, Clone, PartialEq)]
pub enum MismatchKind {
    /// An expected key is not present.
    MissingKey,
    /// Scalar values differ.
    ValueDiffers {
        /// The expected value.
        expected: Value,
        /// The actual value.
        actual: Value,
    },
    /// The actual value has a different JSON type.
    TypeDiffers {
        /// Type of the expected value.
        expected: JsonType,
        /// Type of the actual value.
        actual: JsonType,
    },
    /// No element of the actual sequence matches this expected element.
    NoMatchingElement {
        /// The unmatched expected element.
        expected: Value,
    },
}

impl fmt::Display for SubsetMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        match &self.kind {
            MismatchKind::MissingKey => write!(f, "missing key '{at}'"),
            MismatchKind::ValueDiffers { expected, actual } => {
                write!(f, "at '{at}' expected {expected} but found {actual}")
            }
            MismatchKind::TypeDiffers { expected, actual } => {
                write!(f, "at '{at}' expected {expected} but found {actual}")
            }
            MismatchKind::NoMatchingElement { expected } => {
                write!(f, "no element of '{at}' matches {expected}")
            }
        }
    }
}

/// Returns true if `expected` is a structural subset of `actual`.
#[must_use]
pub fn contains_subset(actual: &Value, expected: &Value) -> bool {
    find_subset_mismatch(actual, expected).is_none()
}

/// Returns the first mismatch between `actual` and the `expected` subset.
#[must_use]
pub fn find_subset_mismatch(actual: &Value, expected: &Value) -> Option<SubsetMismatch> {
    mismatch_at(actual, expected, String::new())
}

fn mismatch_at(actual: &Value, expected: &Value, path: String) -> Option<SubsetMismatch> {
    match (expected, actual) {
        (Value::Object(expected_map), Value::Object(actual_map)) => {
            expected_map.iter().find_map(|(key, expected_value)| {
                let child = join_key(&path, key);
                match actual_map.get(key) {
                    Some(actual_value) => mismatch_at(actual_value, expected_value, child),
                    None => Some(SubsetMismatch {
                        path: child,
                        kind: MismatchKind::MissingKey,
                    }),
                }
            })
        }
        (Value::Array(expected_items), Value::Array(actual_items)) => {
            expected_items
                .iter()
                .enumerate()
                .find_map(|(index, expected_item)| {
                    let matched = actual_items
                        .iter()
                        .any(|actual_item| contains_subset(actual_item, expected_item));
                    (!matched).then(|| SubsetMismatch {
                        path: format!("{path}[{index}]"),
                        kind: MismatchKind::NoMatchingElement {
                            expected: expected_item.clone(),
                        },
                    })
                })
        }
        (Value::Object(_) | Value::Array(_), _) => Some(SubsetMismatch {
            path,
            kind: MismatchKind::TypeDiffers {
                expected: JsonType::of(expected),
                actual: JsonType::of(actual),
            },
        }),
        _ if values_equal(actual, expected) => None,
        _ => Some(SubsetMismatch {
            path,
            kind: MismatchKind::ValueDiffers {
                expected: expected.clone(),
                actual: actual.clone(),
            },
        }),
    }
}

fn join_key(path: &str, key: &str) -> String {
    if key.contains(['.', '[', ']']) {
        format!("{path}[\"{key}\"]")
    } else if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
