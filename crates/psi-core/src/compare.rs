//! Baseline vs. current comparison of two analysis results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::{Category, Strategy};
use crate::format::{AnalysisResult, CategoryScores, CoreMetrics};

/// Score delta (in points) at or above which a change counts as significant.
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: i32 = 5;

/// `current - baseline` per category; positive is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDifferences {
    pub performance: i32,
    pub accessibility: i32,
    pub best_practices: i32,
    pub seo: i32,
}

impl ScoreDifferences {
    fn between(baseline: &CategoryScores, current: &CategoryScores) -> Self {
        let d = |c: Category| current.get(c) as i32 - baseline.get(c) as i32;
        Self {
            performance: d(Category::Performance),
            accessibility: d(Category::Accessibility),
            best_practices: d(Category::BestPractices),
            seo: d(Category::Seo),
        }
    }

    fn entries(&self) -> [(Category, i32); 4] {
        [
            (Category::Performance, self.performance),
            (Category::Accessibility, self.accessibility),
            (Category::BestPractices, self.best_practices),
            (Category::Seo, self.seo),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Improved,
    Regressed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignificantChange {
    pub category: Category,
    pub difference: i32,
    pub direction: ChangeDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub baseline_url: String,
    pub current_url: String,
    pub strategy: Strategy,
    pub score_differences: ScoreDifferences,
    /// Raw `current - baseline` for metrics present on both sides; negative is better.
    pub metric_differences: BTreeMap<String, f64>,
    pub significant_changes: Vec<SignificantChange>,
    pub improvement: bool,
}

/// Compares two results. Missing scores count as all zeros and missing
/// metrics are left out of `metricDifferences`.
pub fn compare(baseline: &AnalysisResult, current: &AnalysisResult, threshold: i32) -> ComparisonResult {
    let zero = CategoryScores::default();
    let scores = ScoreDifferences::between(
        baseline.scores.as_ref().unwrap_or(&zero),
        current.scores.as_ref().unwrap_or(&zero),
    );

    let empty = CoreMetrics::default();
    let base_metrics = baseline.metrics.as_ref().unwrap_or(&empty).entries();
    let cur_metrics = current.metrics.as_ref().unwrap_or(&empty).entries();
    let metric_differences: BTreeMap<String, f64> = base_metrics
        .iter()
        .zip(cur_metrics.iter())
        .filter_map(|((name, b), (_, c))| match (b, c) {
            (Some(b), Some(c)) => Some((name.to_string(), c.value - b.value)),
            _ => None,
        })
        .collect();

    let threshold = threshold.abs();
    let significant_changes = scores
        .entries()
        .into_iter()
        .filter(|(_, d)| d.abs() >= threshold && *d != 0)
        .map(|(category, difference)| SignificantChange {
            category,
            difference,
            direction: if difference > 0 {
                ChangeDirection::Improved
            } else {
                ChangeDirection::Regressed
            },
        })
        .collect();

    let (mut better, mut worse) = (0usize, 0usize);
    for (_, d) in scores.entries() {
        if d > 0 {
            better += 1;
        } else if d < 0 {
            worse += 1;
        }
    }
    for d in metric_differences.values() {
        if *d < 0.0 {
            better += 1;
        } else if *d > 0.0 {
            worse += 1;
        }
    }

    ComparisonResult {
        baseline_url: baseline.url.clone(),
        current_url: current.url.clone(),
        strategy: current.strategy,
        score_differences: scores,
        metric_differences,
        significant_changes,
        improvement: better > worse,
    }
}
