//! Flags layered over config values.

use crate::cli::args::{AnalysisArgs, CategoryArg, FormatArg, SitemapArgs, StrategyArg, UrlTypeArg};
use psi_core::api::{Category, StrategyChoice};
use psi_core::config::PsiConfig;
use psi_core::format::OutputFormat;
use psi_core::sitemap::UrlType;
use std::time::Duration;

#[test]
fn unset_flags_keep_config_values() {
    let cfg = PsiConfig {
        concurrency: 4,
        locale: Some("nl".to_string()),
        skip_content_check: true,
        ..PsiConfig::default()
    };
    let o = AnalysisArgs::default().operation_options(&cfg);
    assert_eq!(o.batch.concurrency, 4);
    assert_eq!(o.request.locale.as_deref(), Some("nl"));
    assert!(o.analysis.skip_content_check);
    assert_eq!(o.request.strategy, StrategyChoice::Mobile);
    assert_eq!(o.request.categories.len(), 4);
    assert_eq!(o.request.retry_attempts, None);
}

#[test]
fn flags_override_config() {
    let args = AnalysisArgs {
        strategy: Some(StrategyArg::Desktop),
        categories: vec![CategoryArg::Seo, CategoryArg::Performance, CategoryArg::Seo],
        format: Some(FormatArg::Complete),
        concurrency: Some(8),
        batch_delay_ms: Some(0),
        retries: Some(0),
        timeout_secs: Some(15),
        ..AnalysisArgs::default()
    };
    let o = args.operation_options(&PsiConfig::default());
    assert_eq!(o.request.strategy, StrategyChoice::Desktop);
    assert_eq!(o.request.categories, vec![Category::Performance, Category::Seo]);
    assert_eq!(o.analysis.output_format, OutputFormat::Complete);
    assert_eq!(o.batch.concurrency, 8);
    assert_eq!(o.batch.batch_delay, Duration::ZERO);
    assert_eq!(o.request.retry_attempts, Some(0));
    assert_eq!(o.request.timeout, Duration::from_secs(15));
}

#[test]
fn sitemap_flags_and_defaults() {
    let cfg = PsiConfig::default();
    let defaults = SitemapArgs::default();
    assert_eq!(defaults.filters(&cfg).max_urls, 50);
    assert_eq!(defaults.sitemap_options(&cfg).max_nested_sitemaps, 5);

    let args = SitemapArgs {
        include: Some("shop".to_string()),
        max_urls: Some(7),
        url_type: Some(UrlTypeArg::Posts),
        max_nested: Some(1),
        ..SitemapArgs::default()
    };
    let f = args.filters(&cfg);
    assert_eq!(f.include_pattern.as_deref(), Some("shop"));
    assert_eq!(f.max_urls, 7);
    assert_eq!(f.url_type, UrlType::Posts);
    assert_eq!(args.sitemap_options(&cfg).max_nested_sitemaps, 1);
}
