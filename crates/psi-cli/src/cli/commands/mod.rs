//! CLI command handlers, one file per subcommand.

mod analyze;
mod batch;
mod compare;
mod completions;
mod man;
mod sitemap;

pub use analyze::run_analyze;
pub use batch::run_batch;
#[cfg(test)]
pub use batch::read_input_urls;
pub use compare::run_compare;
pub use completions::run_completions;
pub use man::run_man;
pub use sitemap::run_sitemap;

use anyhow::{Context, Result};
use psi_core::api::PageSpeedClient;
use psi_core::config::PsiConfig;
use psi_core::error::PsiError;
use psi_core::http::{CurlClient, HttpClient};
use psi_core::operations::OutputRecord;
use psi_core::retry::RetryPolicy;
use std::sync::Arc;

/// PageSpeed client from config; fails when no API key is configured.
fn build_client(cfg: &PsiConfig) -> Result<PageSpeedClient> {
    let api_key = cfg.resolve_api_key().ok_or(PsiError::MissingApiKey)?;
    let http: Arc<dyn HttpClient> = Arc::new(CurlClient::default());
    let client = PageSpeedClient::new(
        http,
        cfg.endpoint.clone(),
        api_key,
        RetryPolicy::from(&cfg.retry_config()),
    )?;
    Ok(client)
}

/// Prints records as a pretty JSON array on stdout.
fn print_records(records: &[OutputRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("serialize results")?;
    println!("{}", json);
    Ok(())
}
