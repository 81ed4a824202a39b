//! Retry and backoff policy.
//!
//! This module encapsulates error classification (timeouts, throttling,
//! quota, authentication, connection failures) and exponential backoff
//! decisions so the API client and every operation share one policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{api_error_message, classify_response, classify_status, classify_transport};
pub use error::ClassifiedError;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::run_with_retry;
