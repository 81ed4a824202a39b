//! `psi sitemap` – analyze the pages listed in a sitemap.

use anyhow::Result;
use psi_core::config::PsiConfig;
use psi_core::operations::analyze_sitemap;

use super::{build_client, print_records};
use crate::cli::{AnalysisArgs, SitemapArgs};

pub async fn run_sitemap(
    cfg: &PsiConfig,
    sitemap_url: &str,
    sitemap: &SitemapArgs,
    summary: bool,
    args: &AnalysisArgs,
) -> Result<()> {
    let client = build_client(cfg)?;
    let mut options = args.operation_options(cfg);
    options.include_summary = summary;
    let records = analyze_sitemap(
        &client,
        sitemap_url,
        &sitemap.filters(cfg),
        &sitemap.sitemap_options(cfg),
        &options,
    )
    .await?;
    print_records(&records)
}
