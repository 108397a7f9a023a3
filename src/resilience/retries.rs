//! Retry logic.
//!
//! # Responsibilities
//! - Run a blocking operation up to `max_attempts` times
//! - Sleep with jittered exponential backoff between attempts
//! - Report the attempt count alongside the last error
//!
//! # Design Decisions
//! - `max_attempts` counts total attempts, so 1 means "no retry"
//! - A zero `max_attempts` is treated as 1; the operation always runs once

use std::fmt::Display;
use std::thread;

use crate::config::schema::RetryConfig;
use crate::resilience::backoff::backoff_delay;

/// Outcome of an exhausted retry loop.
#[derive(Debug)]
pub struct RetriesExhausted<E> {
    pub attempts: u32,
    pub last: E,
}

/// Run `op` until it succeeds or the budget in `policy` is spent.
///
/// `op` receives the 1-based attempt number.
pub fn retry_blocking<T, E, F>(
    policy: &RetryConfig,
    operation: &str,
    mut op: F,
) -> Result<T, RetriesExhausted<E>>
where
    E: Display,
    F: FnMut(u32) -> Result<T, E>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                tracing::warn!(operation, attempt, error = %e, "Retries exhausted");
                return Err(RetriesExhausted { attempts: attempt, last: e });
            }
            Err(e) => {
                let delay = backoff_delay(attempt, policy);
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, will retry"
                );
                thread::sleep(delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    #[test]
    fn test_succeeds_after_failures() {
        let mut calls = 0;
        let result: Result<&str, _> = retry_blocking(&policy(3), "test", |_| {
            calls += 1;
            if calls < 3 { Err("boom") } else { Ok("done") }
        });

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_exhausted_reports_attempts() {
        let result: Result<(), _> = retry_blocking(&policy(2), "test", |n| Err(format!("fail {n}")));

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 2);
        assert_eq!(exhausted.last, "fail 2");
    }

    #[test]
    fn test_zero_budget_runs_once() {
        let mut calls = 0;
        let _ = retry_blocking::<(), _, _>(&policy(0), "test", |_| {
            calls += 1;
            Err("no")
        });
        assert_eq!(calls, 1);
    }
}
