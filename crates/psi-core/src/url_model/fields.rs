//! Pull a URL out of an input record by an ordered list of field names.

use serde_json::Value;

/// Field names tried, in order, when none are configured.
pub const DEFAULT_URL_FIELDS: &[&str] = &[
    "url", "URL", "link", "website", "domain", "href", "pageUrl", "page_url", "siteUrl",
];

/// Returns the first non-blank string found under one of `field_names`.
///
/// Non-object records and non-string values are skipped.
pub fn extract_url<S: AsRef<str>>(record: &Value, field_names: &[S]) -> Option<String> {
    let obj = record.as_object()?;
    for name in field_names {
        if let Some(Value::String(s)) = obj.get(name.as_ref()) {
            let s = s.trim();
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}
