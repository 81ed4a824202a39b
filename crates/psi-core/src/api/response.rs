//! Subset of the PageSpeed v5 response that the formatter reads.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpeedResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseResult {
    #[serde(default)]
    pub requested_url: Option<String>,
    #[serde(default)]
    pub final_url: Option<String>,
    #[serde(default)]
    pub lighthouse_version: Option<String>,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryResult>,
    #[serde(default)]
    pub audits: BTreeMap<String, Audit>,
    #[serde(default)]
    pub runtime_error: Option<RuntimeError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryResult {
    #[serde(default)]
    pub title: Option<String>,
    /// 0..1; null when Lighthouse could not score the category.
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub numeric_value: Option<f64>,
    #[serde(default)]
    pub display_value: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeError {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}
