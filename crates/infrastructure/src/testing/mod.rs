//! Declarative suite execution.
//!
//! This module provides the test runner that executes declarative assertions
//! against a wrapped response.

mod runner;

pub use runner::TestRunner;
