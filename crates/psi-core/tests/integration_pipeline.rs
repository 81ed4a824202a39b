//! End-to-end runs over real sockets: CurlClient against a local server
//! standing in for the site, its sitemap and the PageSpeed API.

mod common;

use common::psi_server::{self, Response};
use psi_core::api::PageSpeedClient;
use psi_core::content_check;
use psi_core::error::ErrorType;
use psi_core::http::{CurlClient, HttpClient};
use psi_core::operations::{analyze_multiple, analyze_sitemap, OperationOptions, OutputRecord};
use psi_core::retry::RetryPolicy;
use psi_core::scheduler::BatchOptions;
use psi_core::sitemap::{SitemapOptions, UrlFilters};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn report_for(target: &str) -> String {
    // Deterministic score per page so order mistakes show up.
    let n: u32 = target
        .rsplit('-')
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    format!(
        r#"{{"lighthouseResult":{{"finalUrl":"{}","categories":{{"performance":{{"score":{}}},"seo":{{"score":1}}}},"audits":{{}}}}}}"#,
        target,
        (n % 100) as f64 / 100.0
    )
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
    }
}

fn client(base: &str) -> PageSpeedClient {
    let http: Arc<dyn HttpClient> = Arc::new(CurlClient::default());
    PageSpeedClient::new(http, format!("{}runPagespeed", base), "test-key", fast_policy()).unwrap()
}

fn options() -> OperationOptions {
    let mut o = OperationOptions::default();
    o.analysis.skip_content_check = true;
    o.batch = BatchOptions::new(10, Duration::ZERO);
    o.request.timeout = Duration::from_secs(10);
    o
}

#[tokio::test(flavor = "multi_thread")]
async fn sitemap_of_120_urls_is_capped_at_50() {
    let base = psi_server::start(|req| match req.path() {
        "/sitemap.xml" => {
            let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><urlset>"#);
            for i in 0..120 {
                xml.push_str(&format!("<url><loc>https://acme-demo.io/page-{}</loc></url>", i));
            }
            xml.push_str("</urlset>");
            Response::new(200, "application/xml", xml)
        }
        "/runPagespeed" => {
            assert_eq!(req.query("key").as_deref(), Some("test-key"));
            let target = req.query("url").unwrap_or_default();
            Response::new(200, "application/json", report_for(&target))
        }
        _ => Response::new(404, "text/plain", "not found"),
    });

    let filters = UrlFilters::default();
    let sitemap_opts = SitemapOptions {
        nested_fetch_delay: Duration::ZERO,
        timeout: Duration::from_secs(5),
        ..SitemapOptions::default()
    };
    let records = analyze_sitemap(
        &client(&base),
        &format!("{}sitemap.xml", base),
        &filters,
        &sitemap_opts,
        &options(),
    )
    .await
    .unwrap();

    assert_eq!(records.len(), 51);
    let meta = serde_json::to_value(&records[0]).unwrap();
    assert_eq!(meta["totalUrlsFound"], 120);
    assert_eq!(meta["urlsToAnalyze"], 50);

    for (i, record) in records[1..].iter().enumerate() {
        let OutputRecord::Analysis(r) = record else {
            panic!("record {} is not an analysis", i + 1);
        };
        assert_eq!(r.url, format!("https://acme-demo.io/page-{}", i));
        assert!(r.is_success(), "{:?}", r.error);
        assert_eq!(r.scores.unwrap().performance, i as u32);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn transient_server_errors_are_retried() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let base = psi_server::start(move |req| {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            return Response::new(503, "application/json", r#"{"error":{"message":"backend unavailable"}}"#);
        }
        Response::new(200, "application/json", report_for(&req.query("url").unwrap_or_default()))
    });

    let records = analyze_multiple(&client(&base), &["acme-demo.io/page-42"], &options())
        .await
        .unwrap();
    let r = records[0].as_analysis().unwrap();
    assert!(r.is_success(), "{:?}", r.error);
    assert_eq!(r.scores.unwrap().performance, 42);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn rate_limit_exhausts_retries() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let base = psi_server::start(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Response::new(429, "application/json", r#"{"error":{"message":"Too many requests"}}"#)
    });

    let records = analyze_multiple(&client(&base), &["acme-demo.io"], &options())
        .await
        .unwrap();
    let r = records[0].as_analysis().unwrap();
    assert_eq!(r.error_type, Some(ErrorType::RateLimited));
    assert_eq!(r.can_retry, Some(false));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[test]
fn content_probe_over_curl() {
    let base = psi_server::start(|req| match (req.method.as_str(), req.path()) {
        (_, "/page") => Response::new(200, "text/html; charset=utf-8", "<html></html>"),
        (_, "/report") => Response::new(200, "application/pdf", "%PDF-1.7"),
        ("HEAD", "/no-head") => Response::new(405, "text/plain", ""),
        ("GET", "/no-head") => {
            assert_eq!(req.header("range"), Some("bytes=0-1023"));
            Response::new(206, "application/xhtml+xml", "<html")
        }
        _ => Response::new(404, "text/plain", "missing"),
    });
    let curl = CurlClient::default();
    let t = Duration::from_secs(5);

    let html = content_check::validate(&curl, &format!("{}page", base), t);
    assert!(html.is_valid);
    assert_eq!(html.content_type.as_deref(), Some("text/html; charset=utf-8"));

    let pdf = content_check::validate(&curl, &format!("{}report", base), t);
    assert!(!pdf.is_valid);
    assert!(pdf.error.unwrap().contains("application/pdf"));

    let fallback = content_check::validate(&curl, &format!("{}no-head", base), t);
    assert!(fallback.is_valid);
    assert_eq!(fallback.content_type.as_deref(), Some("application/xhtml+xml"));

    let down = content_check::validate(&curl, &format!("{}page", psi_server::closed_port_url()), t);
    assert!(down.is_valid);
    assert!(down.error.is_some());
}
