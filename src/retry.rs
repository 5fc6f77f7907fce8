//! Retry wrapper for the test-suite execution
//!
//! Transient infrastructure hiccups (cluster still settling, benchmark tool
//! losing its connection) are retried with a delay and multiplicative
//! backoff. Policy values are fixed; tuning them is out of scope here.

use std::time::Duration;

/// Retry policy: attempt count, initial delay, backoff factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts (including the first)
    pub tries: u32,
    /// Delay before the second attempt
    pub delay: Duration,
    /// Multiplier applied to the delay after each failed attempt
    pub backoff: u32,
}

/// Policy applied to the overall suite execution
pub const SUITE_RETRY: RetryPolicy = RetryPolicy {
    tries: 3,
    delay: Duration::from_secs(60),
    backoff: 2,
};

/// Environment override for the retry delay, in milliseconds
pub const RETRY_DELAY_ENV_VAR: &str = "BENCHSTACK_RETRY_DELAY_MS";

/// Suite retry policy with the `BENCHSTACK_RETRY_DELAY_MS` override applied.
/// CI harnesses exercising failure paths set it to avoid minute-long waits.
pub fn suite_retry_policy() -> RetryPolicy {
    let delay = std::env::var(RETRY_DELAY_ENV_VAR)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(SUITE_RETRY.delay);
    RetryPolicy {
        delay,
        ..SUITE_RETRY
    }
}

/// Call `f` until it succeeds or the policy is exhausted, sleeping between
/// attempts. The error of the final attempt is returned.
pub fn retry_call<T, E, F>(policy: RetryPolicy, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
{
    let tries = policy.tries.max(1);
    let mut delay = policy.delay;

    for attempt in 1..=tries {
        match f() {
            Ok(value) => return Ok(value),
            Err(err) if attempt == tries => return Err(err),
            Err(_) => {
                std::thread::sleep(delay);
                delay *= policy.backoff;
            }
        }
    }
    unreachable!("retry loop always returns")
}
