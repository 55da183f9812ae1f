//! Verdict Domain - Core assertion types
//!
//! This crate defines the domain model for Verdict response assertions.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod path;
pub mod response;
pub mod settings;
pub mod subset;
pub mod testing;
pub mod timestamp;
pub mod value;

pub use error::{AssertionError, CheckResult};
pub use path::{PathError, PathResult, PathSegment, PropertyPath};
pub use response::Response;
pub use settings::{AssertionSettings, DEFAULT_TIMESTAMP_FIELD, DEFAULT_TIMESTAMP_TOLERANCE_MS};
pub use subset::{MismatchKind, SubsetMismatch, contains_subset, find_subset_mismatch};
pub use testing::{Assertion, AssertionResult, StatusExpectation, TestResults, TestSuite};
pub use timestamp::{drift, parse_timestamp, parse_timestamp_str};
pub use value::{JsonType, UnknownJsonType, compare_numbers, display_value, values_equal};
