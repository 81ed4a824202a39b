//! Per-URL pipeline: normalize, allow check, content probe, API call, format.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use crate::api::{Category, PageSpeedClient, RequestConfig, StrategyChoice};
use crate::content_check::{self, ContentCheck, DEFAULT_PROBE_TIMEOUT};
use crate::error::ErrorType;
use crate::format::{format, AnalysisResult, OutputFormat, ResultContext};
use crate::url_model::{is_allowed_for_analysis, normalize, NormalizedUrl};

/// Request settings shared by every job of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    pub strategy: StrategyChoice,
    pub categories: Vec<Category>,
    pub locale: Option<String>,
    pub screenshot: bool,
    pub timeout: Duration,
    pub retry_attempts: Option<u32>,
}

impl Default for RequestTemplate {
    fn default() -> Self {
        Self {
            strategy: StrategyChoice::default(),
            categories: Category::ALL.to_vec(),
            locale: None,
            screenshot: false,
            timeout: Duration::from_secs(60),
            retry_attempts: None,
        }
    }
}

/// Unit of work for the scheduler: the original input next to its request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisJob {
    pub input: NormalizedUrl,
    pub request: RequestConfig,
}

/// One job per input per strategy, input-major (`a/mobile, a/desktop, b/mobile, ...`).
/// Inputs that fail normalization still get jobs so they surface as results.
pub fn build_jobs<S: AsRef<str>>(inputs: &[S], template: &RequestTemplate) -> Vec<AnalysisJob> {
    let strategies = template.strategy.expand();
    inputs
        .iter()
        .map(|raw| normalize(raw.as_ref()))
        .flat_map(|input| {
            strategies.iter().map(move |&strategy| {
                let mut request = RequestConfig::new(input.normalized.clone(), strategy);
                request.categories = template.categories.clone();
                request.locale = template.locale.clone();
                request.screenshot = template.screenshot;
                request.timeout = template.timeout;
                request.retry_attempts = template.retry_attempts;
                AnalysisJob {
                    input: input.clone(),
                    request,
                }
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub output_format: OutputFormat,
    pub skip_content_check: bool,
    pub probe_timeout: Duration,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            skip_content_check: false,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Content-type verdicts keyed by normalized URL. Concurrent lookups of the
/// same URL wait on one probe.
#[derive(Debug, Default)]
struct ProbeCache {
    entries: Mutex<HashMap<String, Arc<OnceLock<ContentCheck>>>>,
}

impl ProbeCache {
    fn get_or_probe(&self, url: &str, probe: impl FnOnce() -> ContentCheck) -> ContentCheck {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(entries.entry(url.to_string()).or_default())
        };
        cell.get_or_init(probe).clone()
    }
}

/// Turns jobs into results. Cheap to clone; clones share the HTTP client and
/// the probe cache, so each URL is probed once however many strategies run.
#[derive(Debug, Clone)]
pub struct Analyzer {
    client: PageSpeedClient,
    options: AnalysisOptions,
    probes: Arc<ProbeCache>,
}

impl Analyzer {
    pub fn new(client: PageSpeedClient, options: AnalysisOptions) -> Self {
        Self {
            client,
            options,
            probes: Arc::default(),
        }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Runs the whole pipeline for one job. Never fails: every problem ends
    /// up in the result's `error`/`errorType`.
    ///
    /// Blocks the current thread; async callers use `spawn_blocking`.
    pub fn analyze(&self, job: &AnalysisJob) -> AnalysisResult {
        let ctx = ResultContext {
            url: if job.input.is_ok() {
                job.input.normalized.clone()
            } else {
                job.input.original.clone()
            },
            original_url: job.input.original.clone(),
            strategy: job.request.strategy,
            screenshot: job.request.screenshot,
            categories: job.request.categories.clone(),
        };

        if let Some(reason) = &job.input.error {
            tracing::info!(input = %job.input.original, %reason, "skipping invalid URL");
            return AnalysisResult::failure(&ctx, ErrorType::InvalidUrl, reason.clone(), false);
        }
        if let Err(reason) = is_allowed_for_analysis(&ctx.url) {
            tracing::info!(url = %ctx.url, %reason, "URL not allowed for analysis");
            return AnalysisResult::failure(&ctx, ErrorType::InvalidUrl, reason, false);
        }

        if !self.options.skip_content_check {
            let check = self.probes.get_or_probe(&ctx.url, || {
                content_check::validate(
                    self.client.http().as_ref(),
                    &ctx.url,
                    self.options.probe_timeout,
                )
            });
            if !check.is_valid {
                let message = check
                    .error
                    .unwrap_or_else(|| format!("{} does not serve HTML", ctx.url));
                return AnalysisResult::failure(&ctx, ErrorType::InvalidContentType, message, false);
            }
        }

        let outcome = self.client.run(&job.request);
        let result = format(&outcome, &ctx, self.options.output_format);
        match &result.error_type {
            None => tracing::info!(url = %result.url, strategy = %result.strategy, "analysis complete"),
            Some(kind) => tracing::warn!(
                url = %result.url,
                strategy = %result.strategy,
                error_type = %kind,
                "analysis failed"
            ),
        }
        result
    }
}
