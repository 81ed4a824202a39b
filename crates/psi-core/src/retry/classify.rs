//! Classify HTTP statuses, API error bodies and transport failures.

use crate::error::ErrorType;
use crate::http::{HttpResponse, TransportError};

use super::error::ClassifiedError;

/// Classify an HTTP status plus the API's error message.
///
/// Message wording wins over the bare status where the API is ambiguous
/// (an invalid key comes back as 400, quota problems as 403 or 429).
pub fn classify_status(status: u32, message: &str) -> ErrorType {
    let lower = message.to_ascii_lowercase();

    if status == 401 || lower.contains("api key") || lower.contains("api_key_invalid") {
        return ErrorType::AuthenticationError;
    }
    if status == 403 && (lower.contains("quota") || lower.contains("billing")) {
        return ErrorType::QuotaExceeded;
    }
    if status == 429 || lower.contains("rate limit") || lower.contains("quota") {
        return ErrorType::RateLimited;
    }
    if lower.contains("not_html") || lower.contains("not html") {
        return ErrorType::NotHtml;
    }
    if status == 408 || status == 504 || lower.contains("timed out") || lower.contains("timeout")
    {
        return ErrorType::Timeout;
    }
    match status {
        400..=499 => ErrorType::ApiError,
        _ => ErrorType::Unknown,
    }
}

/// Classify a non-2xx API response.
pub fn classify_response(response: &HttpResponse) -> ClassifiedError {
    let body = response.text();
    let message = api_error_message(&body)
        .unwrap_or_else(|| format!("PageSpeed API returned HTTP {}", response.status));
    let kind = classify_status(response.status, &message);
    ClassifiedError::new(kind, message, Some(response.status))
}

/// Classify a failure to get any response.
pub fn classify_transport(error: &TransportError) -> ClassifiedError {
    let kind = match error {
        TransportError::Timeout(_) => ErrorType::Timeout,
        TransportError::Connection(_) => ErrorType::NetworkError,
        TransportError::Other(_) => ErrorType::Unknown,
    };
    ClassifiedError::new(kind, error.to_string(), None)
}

/// Extracts `error.message` from a Google API error body.
pub fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}
