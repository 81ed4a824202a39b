//! Interpret a `Content-Type` header value.

use super::ContentCheck;

/// True for `text/html` and `application/xhtml(+xml)` media types.
pub fn is_html_content_type(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.contains("text/html") || lower.contains("application/xhtml")
}

/// Missing header is treated as valid; the API will decide.
pub(super) fn check_content_type(header: Option<&str>) -> ContentCheck {
    match header.map(str::trim).filter(|v| !v.is_empty()) {
        None => ContentCheck {
            is_valid: true,
            content_type: None,
            error: None,
        },
        Some(ct) if is_html_content_type(ct) => ContentCheck {
            is_valid: true,
            content_type: Some(ct.to_string()),
            error: None,
        },
        Some(ct) => ContentCheck {
            is_valid: false,
            content_type: Some(ct.to_string()),
            error: Some(format!("URL serves {} instead of HTML", ct)),
        },
    }
}
