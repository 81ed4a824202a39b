//! `psi compare` – compare URLs against the first one.

use anyhow::Result;
use psi_core::config::PsiConfig;
use psi_core::operations::compare_urls;

use super::{build_client, print_records};
use crate::cli::AnalysisArgs;

pub async fn run_compare(
    cfg: &PsiConfig,
    urls: &[String],
    threshold: Option<i32>,
    args: &AnalysisArgs,
) -> Result<()> {
    let client = build_client(cfg)?;
    let mut options = args.operation_options(cfg);
    if let Some(t) = threshold {
        options.significance_threshold = t;
    }
    let records = compare_urls(&client, urls, &options).await?;
    print_records(&records)
}
