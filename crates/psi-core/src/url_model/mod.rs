//! URL normalization and validation.
//!
//! Turns user-supplied strings into canonical HTTPS URLs. Normalization and
//! "allowed for analysis" are separate predicates: a URL can normalize
//! cleanly (e.g. `https://localhost`) and still be refused before any API
//! quota is spent on it.

mod allow;
mod fields;
mod resource;
mod tracking;

pub use allow::is_allowed_for_analysis;
pub use fields::{extract_url, DEFAULT_URL_FIELDS};
pub use resource::is_probably_non_html;
pub use tracking::TRACKING_PARAMS;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::PsiError;

/// Outcome of normalizing one input string. `error` is set iff it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedUrl {
    pub original: String,
    /// Canonical form; empty when `error` is set.
    pub normalized: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NormalizedUrl {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Normalizes `input`, reporting failure through [`NormalizedUrl::error`].
///
/// # Examples
///
/// - `normalize("example.com").normalized` → `"https://example.com"`
/// - `normalize("http://site.com/blog/?utm_source=x").normalized` → `"https://site.com/blog"`
pub fn normalize(input: &str) -> NormalizedUrl {
    match canonicalize(input) {
        Ok(normalized) => NormalizedUrl {
            original: input.to_string(),
            normalized,
            error: None,
        },
        Err(reason) => NormalizedUrl {
            original: input.to_string(),
            normalized: String::new(),
            error: Some(reason),
        },
    }
}

/// Like [`normalize`] but returns the failure as a [`PsiError::InvalidUrl`].
pub fn normalize_url(input: &str) -> Result<String, PsiError> {
    canonicalize(input).map_err(|reason| PsiError::InvalidUrl {
        input: input.to_string(),
        reason,
    })
}

fn canonicalize(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    let stripped =
        trimmed.trim_start_matches(|c: char| c == '/' || c == '.' || c.is_whitespace());
    if stripped.is_empty() {
        return Err(format!("Cannot create valid URL from \"{}\"", input));
    }

    // Plain HTTP is never analyzed; every input is forced onto HTTPS.
    let with_scheme = if let Some(rest) = strip_prefix_ci(stripped, "https://") {
        format!("https://{}", rest)
    } else if let Some(rest) = strip_prefix_ci(stripped, "http://") {
        format!("https://{}", rest)
    } else {
        format!("https://{}", stripped)
    };

    let mut url = Url::parse(&with_scheme)
        .map_err(|_| format!("Cannot create valid URL from \"{}\"", input))?;

    let host = url.host_str().unwrap_or_default().to_string();
    if host.is_empty() {
        return Err(format!("Cannot create valid URL from \"{}\": missing hostname", input));
    }
    if !host.contains('.') && host != "localhost" {
        return Err(format!(
            "Invalid hostname \"{}\" in \"{}\": expected a domain with a TLD",
            host, input
        ));
    }

    tracking::strip_tracking_params(&mut url);

    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed_path = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed_path);
    }

    let mut out = url.to_string();
    // Bare root path: `https://host/` → `https://host`.
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        out.pop();
    }
    Ok(out)
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}
