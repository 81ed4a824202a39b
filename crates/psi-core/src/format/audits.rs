//! Per-audit detail for the `complete` format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::Audit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

pub fn audit_details(audits: &BTreeMap<String, Audit>) -> BTreeMap<String, AuditDetail> {
    audits
        .iter()
        .map(|(id, a)| {
            (
                id.clone(),
                AuditDetail {
                    title: a.title.clone(),
                    score: a.score,
                    numeric_value: a.numeric_value,
                    display_value: a.display_value.clone(),
                },
            )
        })
        .collect()
}

/// `data:` URL of the final screenshot, if the report carries one.
pub fn screenshot_data_url(audits: &BTreeMap<String, Audit>) -> Option<String> {
    let data = audits
        .get("final-screenshot")?
        .details
        .as_ref()?
        .get("data")?
        .as_str()?;
    data.starts_with("data:").then(|| data.to_string())
}
