//! `psi analyze` – analyze one URL.

use anyhow::Result;
use psi_core::config::PsiConfig;
use psi_core::operations::analyze_single;

use super::{build_client, print_records};
use crate::cli::AnalysisArgs;

pub async fn run_analyze(cfg: &PsiConfig, url: &str, args: &AnalysisArgs) -> Result<()> {
    let client = build_client(cfg)?;
    let options = args.operation_options(cfg);
    let records = analyze_single(&client, url, &options).await?;
    print_records(&records)
}
