//! Core Web Vitals and related lab metrics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::Audit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Milliseconds, except CLS which is unitless.
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_contentful_paint: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub largest_contentful_paint: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_blocking_time: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_layout_shift: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_index: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_interactive: Option<Metric>,
}

fn metric(audits: &BTreeMap<String, Audit>, id: &str) -> Option<Metric> {
    let audit = audits.get(id)?;
    Some(Metric {
        value: audit.numeric_value?,
        display_value: audit.display_value.clone(),
        score: audit.score,
    })
}

impl CoreMetrics {
    pub fn from_audits(audits: &BTreeMap<String, Audit>) -> Self {
        Self {
            first_contentful_paint: metric(audits, "first-contentful-paint"),
            largest_contentful_paint: metric(audits, "largest-contentful-paint"),
            total_blocking_time: metric(audits, "total-blocking-time"),
            cumulative_layout_shift: metric(audits, "cumulative-layout-shift"),
            speed_index: metric(audits, "speed-index"),
            time_to_interactive: metric(audits, "interactive"),
        }
    }

    /// Every metric with its output name, in a fixed order.
    pub fn entries(&self) -> [(&'static str, Option<&Metric>); 6] {
        [
            ("firstContentfulPaint", self.first_contentful_paint.as_ref()),
            ("largestContentfulPaint", self.largest_contentful_paint.as_ref()),
            ("totalBlockingTime", self.total_blocking_time.as_ref()),
            ("cumulativeLayoutShift", self.cumulative_layout_shift.as_ref()),
            ("speedIndex", self.speed_index.as_ref()),
            ("timeToInteractive", self.time_to_interactive.as_ref()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_without_numeric_value_is_skipped() {
        let mut audits = BTreeMap::new();
        audits.insert(
            "speed-index".to_string(),
            Audit {
                display_value: Some("n/a".to_string()),
                ..Audit::default()
            },
        );
        audits.insert(
            "interactive".to_string(),
            Audit {
                numeric_value: Some(4100.0),
                ..Audit::default()
            },
        );
        let m = CoreMetrics::from_audits(&audits);
        assert!(m.speed_index.is_none());
        assert_eq!(m.time_to_interactive.unwrap().value, 4100.0);
    }
}
