//! Reshape raw API responses (or classified failures) into [`AnalysisResult`]s.
//!
//! Output formats nest: `scoresOnly` ⊂ `coreMetrics` ⊂ `summary` ⊂ `complete`.

mod audits;
mod metrics;
mod scores;
mod summary;

pub use audits::{audit_details, screenshot_data_url, AuditDetail};
pub use metrics::{CoreMetrics, Metric};
pub use scores::{score_to_percent, CategoryScores};
pub use summary::{grade, recommendations};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::api::{Category, PageSpeedResponse, Strategy};
use crate::error::ErrorType;
use crate::retry::ClassifiedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// Category scores only.
    ScoresOnly,
    /// Scores plus Core Web Vitals.
    CoreMetrics,
    /// Adds a grade and threshold-based recommendations.
    #[default]
    Summary,
    /// Adds every audit and the screenshot when one was requested.
    Complete,
}

impl OutputFormat {
    fn includes_metrics(self) -> bool {
        !matches!(self, OutputFormat::ScoresOnly)
    }

    fn includes_summary(self) -> bool {
        matches!(self, OutputFormat::Summary | OutputFormat::Complete)
    }

    fn includes_audits(self) -> bool {
        matches!(self, OutputFormat::Complete)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::ScoresOnly => "scoresOnly",
            OutputFormat::CoreMetrics => "coreMetrics",
            OutputFormat::Summary => "summary",
            OutputFormat::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Identity of the analyzed item, copied into its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultContext {
    pub url: String,
    pub original_url: String,
    pub strategy: Strategy,
    /// Whether a screenshot was requested (only surfaced by `complete`).
    pub screenshot: bool,
    /// Categories the request asked for. Others score 0 but are not graded or flagged.
    pub categories: Vec<Category>,
}

/// One analyzed URL under one strategy. Terminal once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub url: String,
    pub original_url: String,
    pub strategy: Strategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<CategoryScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<CoreMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audits: Option<BTreeMap<String, AuditDetail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_retry: Option<bool>,
    pub analysis_time: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Error-tagged result for a failure that happened before or during the API call.
    pub fn failure(
        ctx: &ResultContext,
        error_type: ErrorType,
        message: impl Into<String>,
        can_retry: bool,
    ) -> Self {
        Self {
            error: Some(message.into()),
            error_type: Some(error_type),
            can_retry: Some(can_retry),
            ..Self::empty(ctx)
        }
    }

    fn empty(ctx: &ResultContext) -> Self {
        Self {
            url: ctx.url.clone(),
            original_url: ctx.original_url.clone(),
            strategy: ctx.strategy,
            scores: None,
            metrics: None,
            grade: None,
            recommendations: None,
            audits: None,
            screenshot: None,
            final_url: None,
            error: None,
            error_type: None,
            can_retry: None,
            analysis_time: Utc::now(),
        }
    }
}

/// Builds the result for one API outcome in the requested format.
pub fn format(
    outcome: &Result<PageSpeedResponse, ClassifiedError>,
    ctx: &ResultContext,
    output: OutputFormat,
) -> AnalysisResult {
    let response = match outcome {
        Ok(r) => r,
        Err(e) => return AnalysisResult::failure(ctx, e.error_type, e.message.clone(), e.can_retry),
    };
    let lighthouse = response.lighthouse_result.clone().unwrap_or_default();

    let mut result = AnalysisResult::empty(ctx);
    let scores = CategoryScores::from_lighthouse(&lighthouse);
    result.scores = Some(scores);
    result.final_url = lighthouse.final_url.clone();

    if output.includes_metrics() {
        let metrics = CoreMetrics::from_audits(&lighthouse.audits);
        if output.includes_summary() {
            if ctx.categories.contains(&Category::Performance) {
                result.grade = Some(grade(scores.performance).to_string());
            }
            result.recommendations = Some(recommendations(&scores, &metrics, &ctx.categories));
        }
        result.metrics = Some(metrics);
    }

    if output.includes_audits() {
        result.audits = Some(audit_details(&lighthouse.audits));
        if ctx.screenshot {
            result.screenshot = screenshot_data_url(&lighthouse.audits);
        }
    }

    result
}
