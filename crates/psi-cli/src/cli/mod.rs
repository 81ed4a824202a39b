//! CLI for PSI, a batch PageSpeed Insights analyzer.

mod args;
mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use psi_core::config;
use std::path::PathBuf;

pub use args::{AnalysisArgs, SitemapArgs};
use commands::{run_analyze, run_batch, run_compare, run_completions, run_man, run_sitemap};

/// Top-level CLI for PSI.
#[derive(Debug, Parser)]
#[command(name = "psi", version)]
#[command(about = "PSI: batch web page analysis with the PageSpeed Insights API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Analyze a single URL.
    Analyze {
        /// Page URL (scheme optional; http is upgraded to https).
        url: String,

        #[command(flatten)]
        opts: AnalysisArgs,
    },

    /// Analyze many URLs, given as arguments and/or read from a JSON file.
    Batch {
        /// Page URLs.
        urls: Vec<String>,

        /// JSON array of URL strings or objects holding a URL field.
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Field names tried in order to find the URL in each input object.
        #[arg(long = "url-field", value_name = "NAME")]
        url_fields: Vec<String>,

        /// Prepend a summary record (counts, average scores, domains).
        #[arg(long)]
        summary: bool,

        #[command(flatten)]
        opts: AnalysisArgs,
    },

    /// Extract URLs from a sitemap (or sitemap index) and analyze them.
    Sitemap {
        /// Sitemap location, e.g. `acme-demo.io/sitemap.xml`.
        sitemap_url: String,

        #[command(flatten)]
        sitemap: SitemapArgs,

        /// Add a summary to the leading metadata record.
        #[arg(long)]
        summary: bool,

        #[command(flatten)]
        opts: AnalysisArgs,
    },

    /// Analyze URLs and compare each against the first one.
    Compare {
        /// Baseline URL followed by the URLs to compare against it.
        #[arg(required = true, num_args = 2..)]
        urls: Vec<String>,

        /// Score delta (points) reported as a significant change.
        #[arg(long, value_name = "POINTS")]
        threshold: Option<i32>,

        #[command(flatten)]
        opts: AnalysisArgs,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = config::load_or_init().context("load config")?;
        tracing::debug!(
            endpoint = %cfg.endpoint,
            strategy = ?cfg.strategy,
            concurrency = cfg.concurrency,
            "loaded config"
        );

        match cli.command {
            CliCommand::Analyze { url, opts } => run_analyze(&cfg, &url, &opts).await?,
            CliCommand::Batch {
                urls,
                input,
                url_fields,
                summary,
                opts,
            } => run_batch(&cfg, urls, input.as_deref(), &url_fields, summary, &opts).await?,
            CliCommand::Sitemap {
                sitemap_url,
                sitemap,
                summary,
                opts,
            } => run_sitemap(&cfg, &sitemap_url, &sitemap, summary, &opts).await?,
            CliCommand::Compare {
                urls,
                threshold,
                opts,
            } => run_compare(&cfg, &urls, threshold, &opts).await?,
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
