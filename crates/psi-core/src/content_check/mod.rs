//! Pre-flight content-type probe.
//!
//! Confirms a URL serves HTML before API quota is spent on it. A HEAD
//! request is tried first, then a ranged GET for servers that reject HEAD.
//! Probe failures fail open: the real analysis will report a more specific
//! error than the probe could.

mod parse;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::url_model::is_probably_non_html;

pub use parse::is_html_content_type;

/// Default bound on each probe request.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of probing one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCheck {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probes `url` and reports whether it serves HTML. Never fails.
///
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn validate(client: &dyn HttpClient, url: &str, timeout: Duration) -> ContentCheck {
    if is_probably_non_html(url) {
        return ContentCheck {
            is_valid: false,
            content_type: None,
            error: Some(format!("URL appears to be a non-HTML resource: {}", url)),
        };
    }

    let response = probe(client, HttpRequest::head(url, timeout)).or_else(|head_err| {
        tracing::debug!(url, error = %head_err, "HEAD probe failed, trying ranged GET");
        probe(
            client,
            HttpRequest::get(url, timeout).with_header("Range", "bytes=0-1023"),
        )
    });

    match response {
        Ok(r) => parse::check_content_type(r.header("content-type")),
        Err(e) => {
            tracing::warn!(url, error = %e, "content-type probe failed, continuing");
            ContentCheck {
                is_valid: true,
                content_type: None,
                error: Some(format!("content-type probe failed: {}", e)),
            }
        }
    }
}

fn probe(client: &dyn HttpClient, request: HttpRequest) -> Result<HttpResponse, String> {
    let response = client.execute(&request).map_err(|e| e.to_string())?;
    if response.status >= 400 {
        return Err(format!("HTTP {}", response.status));
    }
    Ok(response)
}
