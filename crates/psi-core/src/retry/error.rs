//! Classified failure of one API request.

use std::fmt;

use crate::error::ErrorType;

/// A failed request after classification; carried into the error-tagged
/// `AnalysisResult` when retries are exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub error_type: ErrorType,
    pub message: String,
    /// HTTP status when a response was received.
    pub status: Option<u32>,
    /// Whether trying again could help. Cleared once the retry loop gives up.
    pub can_retry: bool,
}

impl ClassifiedError {
    pub fn new(error_type: ErrorType, message: impl Into<String>, status: Option<u32>) -> Self {
        Self {
            error_type,
            message: message.into(),
            status,
            can_retry: error_type.is_retryable(),
        }
    }

    /// Marks the error as final (no retries left or not retryable).
    pub fn exhausted(mut self) -> Self {
        self.can_retry = false;
        self
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "{} (HTTP {}): {}", self.error_type, code, self.message),
            None => write!(f, "{}: {}", self.error_type, self.message),
        }
    }
}

impl std::error::Error for ClassifiedError {}
