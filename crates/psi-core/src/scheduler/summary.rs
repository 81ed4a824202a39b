//! Aggregate statistics over a finished batch of analysis results.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use url::Url;

use crate::api::Category;
use crate::error::ErrorType;
use crate::format::{AnalysisResult, CategoryScores};

/// Aggregate view over one run's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_urls: usize,
    pub successful: usize,
    pub failed: usize,
    /// Rounded mean over successful results; absent when none succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_scores: Option<CategoryScores>,
    /// Distinct hosts in first-seen order.
    pub domains: Vec<String>,
    pub errors_by_type: BTreeMap<ErrorType, usize>,
}

impl BatchSummary {
    pub fn from_results(results: &[AnalysisResult]) -> Self {
        let mut domains = Vec::new();
        let mut seen = HashSet::new();
        let mut errors_by_type = BTreeMap::new();
        let mut sums = [0u64; 4];
        let mut scored = 0u64;
        let mut successful = 0;

        for r in results {
            if let Some(host) = Url::parse(&r.url).ok().and_then(|u| u.host_str().map(str::to_string)) {
                if seen.insert(host.clone()) {
                    domains.push(host);
                }
            }
            if !r.is_success() {
                let kind = r.error_type.unwrap_or(ErrorType::Unknown);
                *errors_by_type.entry(kind).or_insert(0) += 1;
                continue;
            }
            successful += 1;
            if let Some(scores) = &r.scores {
                scored += 1;
                for (sum, c) in sums.iter_mut().zip(Category::ALL) {
                    *sum += u64::from(scores.get(c));
                }
            }
        }

        let average_scores = (scored > 0).then(|| {
            let mut avg = CategoryScores::default();
            for (sum, c) in sums.iter().zip(Category::ALL) {
                avg.set(c, (*sum as f64 / scored as f64).round() as u32);
            }
            avg
        });

        Self {
            total_urls: results.len(),
            successful,
            failed: results.len() - successful,
            average_scores,
            domains,
            errors_by_type,
        }
    }
}
