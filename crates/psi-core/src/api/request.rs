//! Request configuration and URL construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::error::PsiError;

/// Device emulation mode sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller asked for; expands to one or two [`Strategy`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyChoice {
    #[default]
    Mobile,
    Desktop,
    Both,
    /// Resolves to mobile.
    Auto,
}

impl StrategyChoice {
    pub fn expand(self) -> Vec<Strategy> {
        match self {
            StrategyChoice::Mobile | StrategyChoice::Auto => vec![Strategy::Mobile],
            StrategyChoice::Desktop => vec![Strategy::Desktop],
            StrategyChoice::Both => vec![Strategy::Mobile, Strategy::Desktop],
        }
    }
}

/// Lighthouse audit grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "performance")]
    Performance,
    #[serde(rename = "accessibility")]
    Accessibility,
    #[serde(rename = "best-practices")]
    BestPractices,
    #[serde(rename = "seo")]
    Seo,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Performance,
        Category::Accessibility,
        Category::BestPractices,
        Category::Seo,
    ];

    /// Key used in `lighthouseResult.categories`.
    pub fn key(self) -> &'static str {
        match self {
            Category::Performance => "performance",
            Category::Accessibility => "accessibility",
            Category::BestPractices => "best-practices",
            Category::Seo => "seo",
        }
    }

    /// Value of the `category` query parameter.
    pub fn api_name(self) -> &'static str {
        match self {
            Category::Performance => "PERFORMANCE",
            Category::Accessibility => "ACCESSIBILITY",
            Category::BestPractices => "BEST_PRACTICES",
            Category::Seo => "SEO",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One API call: a single URL under a single strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    /// Normalized URL to analyze.
    pub url: String,
    pub strategy: Strategy,
    pub categories: Vec<Category>,
    pub locale: Option<String>,
    pub screenshot: bool,
    pub timeout: Duration,
    /// Overrides the client's retry count when set.
    pub retry_attempts: Option<u32>,
}

impl RequestConfig {
    pub fn new(url: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            url: url.into(),
            strategy,
            categories: Category::ALL.to_vec(),
            locale: None,
            screenshot: false,
            timeout: Duration::from_secs(60),
            retry_attempts: None,
        }
    }
}

/// Builds the GET URL: `url`, `strategy`, one `category` per category,
/// optional `locale` and `screenshot=true`, then `key`.
pub fn build_request_url(
    endpoint: &str,
    config: &RequestConfig,
    api_key: &str,
) -> Result<Url, PsiError> {
    let mut url = Url::parse(endpoint).map_err(|e| PsiError::InvalidUrl {
        input: endpoint.to_string(),
        reason: format!("invalid API endpoint: {}", e),
    })?;
    {
        let mut q = url.query_pairs_mut();
        q.append_pair("url", &config.url);
        q.append_pair("strategy", config.strategy.as_str());
        for c in &config.categories {
            q.append_pair("category", c.api_name());
        }
        if let Some(locale) = config.locale.as_deref().filter(|l| !l.trim().is_empty()) {
            q.append_pair("locale", locale.trim());
        }
        if config.screenshot {
            q.append_pair("screenshot", "true");
        }
        q.append_pair("key", api_key);
    }
    Ok(url)
}

/// Request URL with the `key` value masked, for logs.
pub fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "REDACTED".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
