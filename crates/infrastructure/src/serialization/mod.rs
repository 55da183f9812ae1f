//! Serialization of suites and results.
//!
//! JSON output is deterministic:
//! - Using 2-space indentation
//! - Adding trailing newline
//! - UTF-8 encoding without BOM
//!
//! Suites can be read from JSON or YAML.

mod json;
mod suite;

pub use json::*;
pub use suite::{SuiteFormat, load_suite, parse_suite};
