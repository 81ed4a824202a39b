//! Flags shared by the analysis subcommands, layered over the config file.

use clap::{Args, ValueEnum};
use psi_core::api::{Category, StrategyChoice};
use psi_core::config::PsiConfig;
use psi_core::format::OutputFormat;
use psi_core::operations::OperationOptions;
use psi_core::sitemap::{SitemapOptions, UrlFilters, UrlType};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Mobile,
    Desktop,
    /// One request per strategy.
    Both,
    /// Same as mobile.
    Auto,
}

impl From<StrategyArg> for StrategyChoice {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Mobile => StrategyChoice::Mobile,
            StrategyArg::Desktop => StrategyChoice::Desktop,
            StrategyArg::Both => StrategyChoice::Both,
            StrategyArg::Auto => StrategyChoice::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Performance,
    Accessibility,
    BestPractices,
    Seo,
}

impl From<CategoryArg> for Category {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Performance => Category::Performance,
            CategoryArg::Accessibility => Category::Accessibility,
            CategoryArg::BestPractices => Category::BestPractices,
            CategoryArg::Seo => Category::Seo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    ScoresOnly,
    CoreMetrics,
    Summary,
    Complete,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::ScoresOnly => OutputFormat::ScoresOnly,
            FormatArg::CoreMetrics => OutputFormat::CoreMetrics,
            FormatArg::Summary => OutputFormat::Summary,
            FormatArg::Complete => OutputFormat::Complete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UrlTypeArg {
    All,
    /// Skip blog/post/news/article URLs.
    Pages,
    /// Only blog/post/news/article URLs.
    Posts,
}

impl From<UrlTypeArg> for UrlType {
    fn from(t: UrlTypeArg) -> Self {
        match t {
            UrlTypeArg::All => UrlType::All,
            UrlTypeArg::Pages => UrlType::Pages,
            UrlTypeArg::Posts => UrlType::Posts,
        }
    }
}

/// Per-run overrides. Anything left unset comes from config.toml.
#[derive(Debug, Clone, Default, Args)]
pub struct AnalysisArgs {
    /// Device emulation.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Lighthouse category to run (repeatable; default: all four).
    #[arg(long = "category", value_enum)]
    pub categories: Vec<CategoryArg>,

    /// Shape of each result record.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Locale for audit texts, e.g. `de`.
    #[arg(long)]
    pub locale: Option<String>,

    /// Include the final screenshot (with `--format complete`).
    #[arg(long)]
    pub screenshot: bool,

    /// Skip the HEAD/ranged-GET probe that checks for HTML.
    #[arg(long)]
    pub skip_content_check: bool,

    /// Requests in flight per window (1-10).
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Pause between windows.
    #[arg(long, value_name = "MS")]
    pub batch_delay_ms: Option<u64>,

    /// Retries per request after the first try.
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Timeout per API request.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

impl AnalysisArgs {
    /// Config values with these flags applied on top.
    pub fn operation_options(&self, cfg: &PsiConfig) -> OperationOptions {
        let mut o = OperationOptions::from_config(cfg);
        if let Some(s) = self.strategy {
            o.request.strategy = s.into();
        }
        if !self.categories.is_empty() {
            let mut categories: Vec<Category> = self.categories.iter().map(|&c| c.into()).collect();
            categories.sort();
            categories.dedup();
            o.request.categories = categories;
        }
        if let Some(f) = self.format {
            o.analysis.output_format = f.into();
        }
        if let Some(locale) = &self.locale {
            o.request.locale = Some(locale.clone());
        }
        o.request.screenshot = self.screenshot;
        if self.skip_content_check {
            o.analysis.skip_content_check = true;
        }
        if let Some(n) = self.concurrency {
            o.batch.concurrency = n;
        }
        if let Some(ms) = self.batch_delay_ms {
            o.batch.batch_delay = Duration::from_millis(ms);
        }
        o.request.retry_attempts = self.retries;
        if let Some(secs) = self.timeout_secs {
            o.request.timeout = Duration::from_secs(secs);
        }
        o
    }
}

/// Sitemap filters and fetch limits.
#[derive(Debug, Clone, Default, Args)]
pub struct SitemapArgs {
    /// Comma-separated regexes or substrings; keep URLs matching any.
    #[arg(long, value_name = "PATTERNS")]
    pub include: Option<String>,

    /// Comma-separated regexes or substrings; drop URLs matching any.
    #[arg(long, value_name = "PATTERNS")]
    pub exclude: Option<String>,

    /// URLs analyzed after filtering.
    #[arg(long, value_name = "N")]
    pub max_urls: Option<usize>,

    #[arg(long, value_enum)]
    pub url_type: Option<UrlTypeArg>,

    /// Child sitemaps fetched from a sitemap index.
    #[arg(long, value_name = "N")]
    pub max_nested: Option<usize>,
}

impl SitemapArgs {
    pub fn filters(&self, cfg: &PsiConfig) -> UrlFilters {
        UrlFilters {
            include_pattern: self.include.clone(),
            exclude_pattern: self.exclude.clone(),
            max_urls: self.max_urls.unwrap_or(cfg.sitemap_config().max_urls),
            url_type: self.url_type.map(UrlType::from).unwrap_or_default(),
        }
    }

    pub fn sitemap_options(&self, cfg: &PsiConfig) -> SitemapOptions {
        let mut o = SitemapOptions::from(&cfg.sitemap_config());
        if let Some(n) = self.max_nested {
            o.max_nested_sitemaps = n;
        }
        o
    }
}
