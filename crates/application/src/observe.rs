//! Logging around a single check.

use std::fmt::Display;

/// Tracing target for all assertion events.
pub const LOG_TARGET: &str = "verdict";

/// Runs `check`, logging `description` before it and the outcome after.
///
/// The check's result is returned unchanged; logging never turns a failure
/// into a success or alters the error.
///
/// # Errors
///
/// Returns whatever error `check` returns.
pub fn run_observed<T, E, F>(description: &str, check: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: Display,
{
    tracing::info!(target: LOG_TARGET, "{description}");

    let result = check();
    match &result {
        Ok(_) => tracing::debug!(target: LOG_TARGET, check = description, "passed"),
        Err(error) => tracing::error!(target: LOG_TARGET, check = description, "{error}"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;
    use verdict_domain::AssertionError;

    #[test]
    fn test_success_passes_through() {
        let result: Result<u8, AssertionError> = run_observed("answer", || Ok(42));
        assert_eq!(result, Ok(42));
    }

    #[test]
    fn test_error_is_returned_unchanged() {
        let error = AssertionError::new("expected 1 but got 2", "1", "2");
        let result: Result<(), AssertionError> = run_observed("numbers", || Err(error.clone()));
        assert_eq!(result, Err(error));
    }

    #[test]
    fn test_check_runs_exactly_once() {
        let mut calls = 0;
        let _: Result<(), AssertionError> = run_observed("count", || {
            calls += 1;
            Ok(())
        });
        assert_eq!(calls, 1);
    }

    #[test]
    #[traced_test]
    fn test_logs_description_then_failure() {
        let _: Result<(), AssertionError> = run_observed("comparing apples to pears", || {
            Err(AssertionError::new("apples are not pears", "pears", "apples"))
        });

        logs_assert(|lines: &[&str]| {
            let announced = lines
                .iter()
                .any(|line| line.contains(" INFO ") && line.contains("comparing apples to pears"));
            let failed = lines
                .iter()
                .any(|line| line.contains("ERROR") && line.contains("apples are not pears"));
            if announced && failed {
                Ok(())
            } else {
                Err(format!("missing info or error line in {lines:?}"))
            }
        });
    }
}
