use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::api::{Category, StrategyChoice};
use crate::format::OutputFormat;
use crate::url_model::DEFAULT_URL_FIELDS;

/// Environment variable that overrides `api_key` from the config file.
pub const API_KEY_ENV: &str = "PAGESPEED_API_KEY";

/// Default PageSpeed Insights v5 endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first try (2 = up to 3 tries).
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
        }
    }
}

/// Sitemap extraction limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// URLs kept after filtering.
    pub max_urls: usize,
    /// Nested sitemaps fetched from a sitemap index.
    pub max_nested_sitemaps: usize,
    /// Pause between nested sitemap fetches.
    pub nested_fetch_delay_ms: u64,
    /// Timeout for each sitemap fetch.
    pub fetch_timeout_secs: u64,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            max_urls: 50,
            max_nested_sitemaps: 5,
            nested_fetch_delay_ms: 500,
            fetch_timeout_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/psi/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsiConfig {
    /// PageSpeed API key. `PAGESPEED_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub strategy: StrategyChoice,
    pub categories: Vec<Category>,
    pub output_format: OutputFormat,
    #[serde(default)]
    pub locale: Option<String>,
    /// Requests in flight per batch window (clamped to 1..=10).
    pub concurrency: usize,
    /// Pause between batch windows.
    pub batch_delay_ms: u64,
    /// Per-request timeout for the API call.
    pub request_timeout_secs: u64,
    /// Timeout for the pre-flight content-type probe.
    pub probe_timeout_secs: u64,
    pub skip_content_check: bool,
    /// Ordered field names used to pull a URL out of input records.
    pub url_fields: Vec<String>,
    /// Score delta that counts as a significant change when comparing.
    pub significance_threshold: i32,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub sitemap: Option<SitemapConfig>,
}

impl Default for PsiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            strategy: StrategyChoice::Mobile,
            categories: Category::ALL.to_vec(),
            output_format: OutputFormat::Summary,
            locale: None,
            concurrency: 3,
            batch_delay_ms: 1000,
            request_timeout_secs: 60,
            probe_timeout_secs: 10,
            skip_content_check: false,
            url_fields: DEFAULT_URL_FIELDS.iter().map(|s| s.to_string()).collect(),
            significance_threshold: 5,
            retry: None,
            sitemap: None,
        }
    }
}

impl PsiConfig {
    /// API key from the environment, else from the file. Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        from_env
            .into_iter()
            .chain(self.api_key.clone())
            .map(|k| k.trim().to_string())
            .find(|k| !k.is_empty())
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }

    pub fn sitemap_config(&self) -> SitemapConfig {
        self.sitemap.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("psi")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PsiConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PsiConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PsiConfig = toml::from_str(&data)?;
    Ok(cfg)
}
