//! Verdict Application - Response assertions and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The observed-check helper that logs around every assertion
//! - `ResponseAssertions`, the named checks over a wrapped response

pub mod assertions;
pub mod observe;
pub mod ports;

pub use assertions::ResponseAssertions;
pub use observe::run_observed;
pub use ports::Clock;
