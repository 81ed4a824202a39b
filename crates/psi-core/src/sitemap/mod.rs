//! Sitemap extraction.
//!
//! Fetches a sitemap (or sitemap index), collects page URLs and applies
//! [`UrlFilters`]. Fetching blocks the calling thread.

mod filter;
mod parse;

pub use filter::{apply_filters, UrlFilters, UrlType, DEFAULT_MAX_URLS, POST_MARKERS};
pub use parse::{extract_locs, is_sitemap_index};

use std::time::Duration;
use url::Url;

use crate::config::SitemapConfig;
use crate::error::PsiError;
use crate::http::{HttpClient, HttpRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapOptions {
    pub max_nested_sitemaps: usize,
    /// Pause between nested sitemap fetches.
    pub nested_fetch_delay: Duration,
    pub timeout: Duration,
}

impl Default for SitemapOptions {
    fn default() -> Self {
        Self::from(&SitemapConfig::default())
    }
}

impl From<&SitemapConfig> for SitemapOptions {
    fn from(cfg: &SitemapConfig) -> Self {
        Self {
            max_nested_sitemaps: cfg.max_nested_sitemaps,
            nested_fetch_delay: Duration::from_millis(cfg.nested_fetch_delay_ms),
            timeout: Duration::from_secs(cfg.fetch_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapExtraction {
    /// Page `<loc>` entries seen before any filtering.
    pub total_found: usize,
    /// Filtered, deduplicated, truncated page URLs in document order.
    pub urls: Vec<String>,
}

/// Resolves the sitemap location. A given scheme is kept; `https://` is
/// prepended when there is none.
pub fn sitemap_location(input: &str) -> Result<String, PsiError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PsiError::InvalidUrl {
            input: input.to_string(),
            reason: "sitemap URL cannot be empty".to_string(),
        });
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed.trim_start_matches('/'))
    };
    let url = Url::parse(&candidate).map_err(|e| PsiError::InvalidUrl {
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(PsiError::InvalidUrl {
            input: input.to_string(),
            reason: format!("unsupported scheme {:?}", other),
        }),
    }
}

fn fetch_document(client: &dyn HttpClient, url: &str, timeout: Duration) -> Result<String, String> {
    let response = client
        .execute(&HttpRequest::get(url, timeout))
        .map_err(|e| e.to_string())?;
    if !response.is_success() {
        return Err(format!("HTTP {}", response.status));
    }
    Ok(response.text())
}

/// Fetches `sitemap_url` and returns the filtered page URLs.
///
/// The top-level fetch failing is fatal. In a sitemap index, up to
/// `max_nested_sitemaps` children are fetched in order; a child that fails
/// is logged and skipped.
pub fn fetch_sitemap(
    client: &dyn HttpClient,
    sitemap_url: &str,
    filters: &UrlFilters,
    options: &SitemapOptions,
) -> Result<SitemapExtraction, PsiError> {
    let location = sitemap_location(sitemap_url)?;
    let body = fetch_document(client, &location, options.timeout).map_err(|message| {
        PsiError::Sitemap {
            url: location.clone(),
            message,
        }
    })?;

    let raw = if is_sitemap_index(&body) {
        let nested = extract_locs(&body);
        if nested.len() > options.max_nested_sitemaps {
            tracing::info!(
                sitemap = %location,
                found = nested.len(),
                limit = options.max_nested_sitemaps,
                "sitemap index truncated"
            );
        }
        let mut pages = Vec::new();
        for (i, child) in nested.iter().take(options.max_nested_sitemaps).enumerate() {
            if i > 0 && !options.nested_fetch_delay.is_zero() {
                std::thread::sleep(options.nested_fetch_delay);
            }
            match fetch_document(client, child, options.timeout) {
                Ok(xml) => pages.extend(extract_locs(&xml)),
                Err(e) => tracing::warn!(sitemap = %child, error = %e, "skipping nested sitemap"),
            }
        }
        pages
    } else {
        extract_locs(&body)
    };

    let urls = apply_filters(&raw, filters);
    tracing::debug!(
        sitemap = %location,
        total = raw.len(),
        kept = urls.len(),
        "sitemap extracted"
    );
    if urls.is_empty() {
        return Err(PsiError::NoUrlsToAnalyze(format!(
            "sitemap {} listed {} URL(s), none left after filtering",
            location,
            raw.len()
        )));
    }
    Ok(SitemapExtraction {
        total_found: raw.len(),
        urls,
    })
}

/// [`fetch_sitemap`] without the pre-filter count.
pub fn fetch_sitemap_urls(
    client: &dyn HttpClient,
    sitemap_url: &str,
    filters: &UrlFilters,
    options: &SitemapOptions,
) -> Result<Vec<String>, PsiError> {
    fetch_sitemap(client, sitemap_url, filters, options).map(|e| e.urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{respond, FakeClient};
    use crate::http::TransportError;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn urlset(paths: &[String]) -> String {
        let mut xml = String::from("<urlset>");
        for p in paths {
            xml.push_str(&format!("<url><loc>https://acme-demo.io{}</loc></url>", p));
        }
        xml.push_str("</urlset>");
        xml
    }

    fn fast() -> SitemapOptions {
        SitemapOptions {
            nested_fetch_delay: Duration::ZERO,
            ..SitemapOptions::default()
        }
    }

    #[test]
    fn location_keeps_scheme_or_adds_https() {
        assert_eq!(sitemap_location("acme-demo.io/sitemap.xml").unwrap(), "https://acme-demo.io/sitemap.xml");
        assert_eq!(
            sitemap_location("http://127.0.0.1:8080/sitemap.xml").unwrap(),
            "http://127.0.0.1:8080/sitemap.xml"
        );
        assert!(sitemap_location("  ").is_err());
        assert!(sitemap_location("ftp://acme-demo.io/s.xml").is_err());
    }

    #[test]
    fn leaf_sitemap_truncated_to_max_urls() {
        let paths: Vec<String> = (0..120).map(|i| format!("/page-{}", i)).collect();
        let body = urlset(&paths);
        let client = FakeClient::new(move |_| Ok(respond(200, "application/xml", &body)));
        let out = fetch_sitemap(&client, "acme-demo.io/sitemap.xml", &UrlFilters::default(), &fast()).unwrap();
        assert_eq!(out.total_found, 120);
        assert_eq!(out.urls.len(), 50);
        assert_eq!(out.urls[0], "https://acme-demo.io/page-0");
        assert_eq!(out.urls[49], "https://acme-demo.io/page-49");
    }

    #[test]
    fn index_fetches_children_up_to_limit() {
        let client = FakeClient::new(|req| {
            let body = if req.url.ends_with("/sitemap.xml") {
                let locs: String = (1..=7)
                    .map(|i| format!("<sitemap><loc>https://acme-demo.io/s{}.xml</loc></sitemap>", i))
                    .collect();
                format!("<sitemapindex>{}</sitemapindex>", locs)
            } else {
                let n = req.url.trim_end_matches(".xml").rsplit('s').next().unwrap().to_string();
                urlset(&[format!("/from-{}", n)])
            };
            Ok(respond(200, "application/xml", &body))
        });
        let opts = SitemapOptions {
            max_nested_sitemaps: 3,
            ..fast()
        };
        let out = fetch_sitemap(&client, "https://acme-demo.io/sitemap.xml", &UrlFilters::default(), &opts).unwrap();
        assert_eq!(client.request_count(), 4);
        assert_eq!(
            out.urls,
            vec![
                "https://acme-demo.io/from-1",
                "https://acme-demo.io/from-2",
                "https://acme-demo.io/from-3",
            ]
        );
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_child_is_skipped_with_warning() {
        let client = FakeClient::new(|req| {
            if req.url.ends_with("/sitemap.xml") {
                Ok(respond(
                    200,
                    "application/xml",
                    "<sitemapindex><sitemap><loc>https://acme-demo.io/broken.xml</loc></sitemap>\
                     <sitemap><loc>https://acme-demo.io/ok.xml</loc></sitemap></sitemapindex>",
                ))
            } else if req.url.ends_with("/broken.xml") {
                Err(TransportError::Connection("connection refused".to_string()))
            } else {
                Ok(respond(200, "application/xml", &urlset(&["/kept".to_string()])))
            }
        });

        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, || {
            fetch_sitemap(&client, "https://acme-demo.io/sitemap.xml", &UrlFilters::default(), &fast())
        })
        .unwrap();

        assert_eq!(out.urls, vec!["https://acme-demo.io/kept"]);
        let logged = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("WARN"));
        assert!(logged.contains("skipping nested sitemap"));
        assert!(logged.contains("broken.xml"));
    }

    #[test]
    fn top_level_failure_is_fatal() {
        let client = FakeClient::new(|_| Ok(respond(404, "text/html", "missing")));
        let err = fetch_sitemap(&client, "https://acme-demo.io/sitemap.xml", &UrlFilters::default(), &fast())
            .unwrap_err();
        assert!(matches!(err, PsiError::Sitemap { .. }));
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn nothing_left_after_filters() {
        let body = urlset(&["/blog/a".to_string()]);
        let client = FakeClient::new(move |_| Ok(respond(200, "application/xml", &body)));
        let filters = UrlFilters {
            url_type: UrlType::Pages,
            ..UrlFilters::default()
        };
        let err = fetch_sitemap_urls(&client, "https://acme-demo.io/sitemap.xml", &filters, &fast()).unwrap_err();
        assert!(matches!(err, PsiError::NoUrlsToAnalyze(_)));
    }
}
