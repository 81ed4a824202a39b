//! The four operations: analyze one URL, analyze many, analyze a sitemap,
//! compare URLs. Each returns an ordered list of output records.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::analyzer::{build_jobs, AnalysisJob, AnalysisOptions, Analyzer, RequestTemplate};
use crate::api::PageSpeedClient;
use crate::compare::{compare, ComparisonResult, DEFAULT_SIGNIFICANCE_THRESHOLD};
use crate::config::PsiConfig;
use crate::error::{ErrorType, PsiError};
use crate::format::AnalysisResult;
use crate::http::HttpClient;
use crate::scheduler::{process_all, BatchOptions, BatchSummary};
use crate::sitemap::{fetch_sitemap, SitemapOptions, UrlFilters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Single,
    Multiple,
    Sitemap,
    Compare,
}

/// Leading record describing the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub operation: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sitemap_url: Option<String>,
    /// Page URLs listed by the sitemap before filtering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_urls_found: Option<usize>,
    pub urls_to_analyze: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BatchSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputRecord {
    Metadata(RunMetadata),
    Analysis(AnalysisResult),
    Comparison(ComparisonResult),
}

impl OutputRecord {
    pub fn as_analysis(&self) -> Option<&AnalysisResult> {
        match self {
            OutputRecord::Analysis(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOptions {
    pub request: RequestTemplate,
    pub analysis: AnalysisOptions,
    pub batch: BatchOptions,
    /// Prepend a metadata record with a [`BatchSummary`] to multi-URL runs.
    pub include_summary: bool,
    pub significance_threshold: i32,
}

impl Default for OperationOptions {
    fn default() -> Self {
        Self {
            request: RequestTemplate::default(),
            analysis: AnalysisOptions::default(),
            batch: BatchOptions::default(),
            include_summary: false,
            significance_threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
        }
    }
}

impl OperationOptions {
    pub fn from_config(cfg: &PsiConfig) -> Self {
        Self {
            request: RequestTemplate {
                strategy: cfg.strategy,
                categories: cfg.categories.clone(),
                locale: cfg.locale.clone(),
                screenshot: false,
                timeout: Duration::from_secs(cfg.request_timeout_secs),
                retry_attempts: None,
            },
            analysis: AnalysisOptions {
                output_format: cfg.output_format,
                skip_content_check: cfg.skip_content_check,
                probe_timeout: Duration::from_secs(cfg.probe_timeout_secs),
            },
            batch: BatchOptions::new(cfg.concurrency, Duration::from_millis(cfg.batch_delay_ms)),
            include_summary: false,
            significance_threshold: cfg.significance_threshold,
        }
    }

    fn validate(&self) -> Result<(), PsiError> {
        if self.request.categories.is_empty() {
            return Err(PsiError::Config("at least one category is required".to_string()));
        }
        if self.request.timeout.is_zero() {
            return Err(PsiError::Config("request timeout must be positive".to_string()));
        }
        Ok(())
    }
}

/// Runs jobs through the scheduler. An authentication failure aborts the
/// run once the window it happened in has settled.
async fn run_jobs(
    analyzer: &Analyzer,
    jobs: Vec<AnalysisJob>,
    batch: &BatchOptions,
) -> Result<Vec<AnalysisResult>, PsiError> {
    process_all(jobs, batch, |job| {
        let analyzer = analyzer.clone();
        async move {
            let result = tokio::task::spawn_blocking(move || analyzer.analyze(&job)).await?;
            if result.error_type == Some(ErrorType::AuthenticationError) {
                return Err(PsiError::Authentication {
                    url: result.url.clone(),
                    message: result.error.clone().unwrap_or_default(),
                });
            }
            Ok::<_, PsiError>(result)
        }
    })
    .await
}

fn analyzer(client: &PageSpeedClient, options: &OperationOptions) -> Result<Analyzer, PsiError> {
    options.validate()?;
    Ok(Analyzer::new(client.clone(), options.analysis))
}

/// Analyze one URL (one record per strategy).
pub async fn analyze_single(
    client: &PageSpeedClient,
    url: &str,
    options: &OperationOptions,
) -> Result<Vec<OutputRecord>, PsiError> {
    let analyzer = analyzer(client, options)?;
    let jobs = build_jobs(&[url], &options.request);
    let results = run_jobs(&analyzer, jobs, &options.batch).await?;
    Ok(results.into_iter().map(OutputRecord::Analysis).collect())
}

/// Analyze many URLs in input order. Invalid entries become error results.
pub async fn analyze_multiple<S: AsRef<str>>(
    client: &PageSpeedClient,
    urls: &[S],
    options: &OperationOptions,
) -> Result<Vec<OutputRecord>, PsiError> {
    let analyzer = analyzer(client, options)?;
    if urls.iter().all(|u| u.as_ref().trim().is_empty()) {
        return Err(PsiError::NoUrlsToAnalyze("no URLs were provided".to_string()));
    }
    let jobs = build_jobs(urls, &options.request);
    let job_count = jobs.len();
    tracing::info!(urls = urls.len(), jobs = job_count, "analyzing multiple URLs");
    let results = run_jobs(&analyzer, jobs, &options.batch).await?;

    let mut records = Vec::with_capacity(results.len() + 1);
    if options.include_summary {
        records.push(OutputRecord::Metadata(RunMetadata {
            operation: Operation::Multiple,
            sitemap_url: None,
            total_urls_found: None,
            urls_to_analyze: urls.len(),
            summary: Some(BatchSummary::from_results(&results)),
        }));
    }
    records.extend(results.into_iter().map(OutputRecord::Analysis));
    Ok(records)
}

/// Extract URLs from a sitemap and analyze them. The first record is always
/// the run metadata (`totalUrlsFound`, `urlsToAnalyze`).
pub async fn analyze_sitemap(
    client: &PageSpeedClient,
    sitemap_url: &str,
    filters: &UrlFilters,
    sitemap_options: &SitemapOptions,
    options: &OperationOptions,
) -> Result<Vec<OutputRecord>, PsiError> {
    let analyzer = analyzer(client, options)?;

    let http: Arc<dyn HttpClient> = Arc::clone(client.http());
    let (location, filters_owned, sitemap_owned) =
        (sitemap_url.to_string(), filters.clone(), sitemap_options.clone());
    let extraction = tokio::task::spawn_blocking(move || {
        fetch_sitemap(http.as_ref(), &location, &filters_owned, &sitemap_owned)
    })
    .await??;
    tracing::info!(
        sitemap = sitemap_url,
        found = extraction.total_found,
        analyzing = extraction.urls.len(),
        "sitemap URLs selected"
    );

    let jobs = build_jobs(&extraction.urls, &options.request);
    let results = run_jobs(&analyzer, jobs, &options.batch).await?;

    let mut records = Vec::with_capacity(results.len() + 1);
    records.push(OutputRecord::Metadata(RunMetadata {
        operation: Operation::Sitemap,
        sitemap_url: Some(sitemap_url.trim().to_string()),
        total_urls_found: Some(extraction.total_found),
        urls_to_analyze: extraction.urls.len(),
        summary: options
            .include_summary
            .then(|| BatchSummary::from_results(&results)),
    }));
    records.extend(results.into_iter().map(OutputRecord::Analysis));
    Ok(records)
}

/// Analyze every URL, then compare each against the first (the baseline)
/// under the same strategy. Analysis records come first, comparisons after.
/// A pair where either side failed produces no comparison.
pub async fn compare_urls<S: AsRef<str>>(
    client: &PageSpeedClient,
    urls: &[S],
    options: &OperationOptions,
) -> Result<Vec<OutputRecord>, PsiError> {
    let analyzer = analyzer(client, options)?;
    if urls.len() < 2 {
        return Err(PsiError::NoUrlsToAnalyze(
            "comparison needs a baseline and at least one other URL".to_string(),
        ));
    }
    let strategies = options.request.strategy.expand().len();
    let jobs = build_jobs(urls, &options.request);
    let results = run_jobs(&analyzer, jobs, &options.batch).await?;

    // Jobs are input-major, so the baseline's results are the first `strategies` entries.
    let (baseline, rest) = results.split_at(strategies.min(results.len()));
    let mut comparisons = Vec::new();
    for current in rest {
        let Some(base) = baseline.iter().find(|b| b.strategy == current.strategy) else {
            continue;
        };
        if !base.is_success() || !current.is_success() {
            tracing::warn!(
                baseline = %base.url,
                current = %current.url,
                strategy = %current.strategy,
                "skipping comparison with a failed analysis"
            );
            continue;
        }
        comparisons.push(compare(base, current, options.significance_threshold));
    }

    let mut records: Vec<OutputRecord> = results.into_iter().map(OutputRecord::Analysis).collect();
    records.extend(comparisons.into_iter().map(OutputRecord::Comparison));
    Ok(records)
}
