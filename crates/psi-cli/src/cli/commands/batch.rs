//! `psi batch` – analyze many URLs from arguments and/or a JSON file.

use anyhow::{bail, Context, Result};
use psi_core::config::PsiConfig;
use psi_core::operations::analyze_multiple;
use psi_core::url_model::extract_url;
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::{build_client, print_records};
use crate::cli::AnalysisArgs;

/// Reads URLs from a JSON array of strings or objects. Objects are searched
/// with `fields` in order; an object with no URL yields an empty entry so it
/// still shows up as an invalid-URL result at its position.
pub fn read_input_urls(path: &Path, fields: &[String]) -> Result<Vec<String>> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&data).with_context(|| format!("parse JSON in {}", path.display()))?;
    let items = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        _ => bail!("{}: expected a JSON array of URLs or objects", path.display()),
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => s.clone(),
            other => extract_url(other, fields).unwrap_or_else(|| {
                tracing::warn!(index = i, fields = ?fields, "input record has no URL field");
                String::new()
            }),
        })
        .collect())
}

pub async fn run_batch(
    cfg: &PsiConfig,
    mut urls: Vec<String>,
    input: Option<&Path>,
    url_fields: &[String],
    summary: bool,
    args: &AnalysisArgs,
) -> Result<()> {
    if let Some(path) = input {
        let fields = if url_fields.is_empty() {
            cfg.url_fields.as_slice()
        } else {
            url_fields
        };
        urls.extend(read_input_urls(path, fields)?);
    }

    let client = build_client(cfg)?;
    let mut options = args.operation_options(cfg);
    options.include_summary = summary;
    let records = analyze_multiple(&client, urls.as_slice(), &options).await?;
    print_records(&records)
}
