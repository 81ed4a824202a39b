//! Retry loop: run a closure until success or policy says stop.

use super::error::ClassifiedError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f(attempt)` until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
///
/// Blocks the current thread while backing off. The returned error is
/// always marked exhausted.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, ClassifiedError>
where
    F: FnMut(u32) -> Result<T, ClassifiedError>,
{
    let mut attempt = 0u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, e.error_type) {
                RetryDecision::NoRetry => return Err(e.exhausted()),
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(
                        attempt,
                        error_type = %e.error_type,
                        delay_ms = d.as_millis() as u64,
                        "retrying after failure"
                    );
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}
