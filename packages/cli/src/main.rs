#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the price bulletin extractor.
//!
//! Reads local bulletin documents (PDFs or plaintext dumps), extracts
//! their price records and publication date, and prints one
//! `{"data": [...], "date": "YYYY-MM-DD"}` payload per document to stdout.

mod pipeline;
mod progress;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use price_bulletin::{ExtractedDate, ExtractionConfig};

use crate::progress::IndicatifProgress;

#[derive(Parser)]
#[command(name = "price_bulletin", about = "Daily price bulletin extraction tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract price records from one or more bulletins
    Extract {
        /// Bulletin files (`.pdf`, or text with form-feed page breaks)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// TOML file overriding the default keyword tables
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of documents processed at once
        #[arg(long, default_value = "4")]
        concurrency: usize,
        /// Pretty-print each payload instead of one JSON object per line
        #[arg(long)]
        pretty: bool,
    },
    /// Print only the publication date of each bulletin
    Date {
        /// Bulletin files (`.pdf`, or text with form-feed page breaks)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// TOML file overriding the default keyword tables
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of documents processed at once
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },
    /// Print the default extraction config as TOML
    Config,
}

fn load_config(path: Option<&Path>) -> Result<ExtractionConfig, price_bulletin::ConfigError> {
    path.map_or_else(|| Ok(ExtractionConfig::default()), ExtractionConfig::from_path)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = progress::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            files,
            config,
            concurrency,
            pretty,
        } => {
            let config = Arc::new(load_config(config.as_deref())?);
            let total = files.len();

            let bar = IndicatifProgress::documents_bar(
                &multi,
                "Extracting bulletins",
                u64::try_from(total).unwrap_or(u64::MAX),
            );
            let outcomes = pipeline::process_documents(
                files,
                config,
                concurrency,
                &bar,
                pipeline::process_document,
            )
            .await;

            let today = ExtractedDate::from(chrono::Local::now().date_naive());
            let mut failed = 0_usize;
            let mut payloads = Vec::new();

            for outcome in outcomes {
                let path = outcome.path.display();
                match outcome.result {
                    Ok(extraction) if extraction.records.is_empty() => {
                        log::warn!("No data extracted from {path}");
                    }
                    Ok(extraction) => {
                        if extraction.date.is_none() {
                            log::warn!("Using current date {today} as fallback for {path}");
                        }
                        payloads.push(extraction.into_payload(today));
                    }
                    Err(e) => {
                        failed += 1;
                        log::error!("Failed to process {path}: {e}");
                    }
                }
            }

            bar.finish(format!(
                "Extracted {} payload(s), {failed} failure(s)",
                payloads.len()
            ));

            for payload in &payloads {
                let json = if pretty {
                    serde_json::to_string_pretty(payload)?
                } else {
                    serde_json::to_string(payload)?
                };
                println!("{json}");
            }

            if failed == total {
                return Err(format!("all {total} document(s) failed").into());
            }
        }
        Commands::Date {
            files,
            config,
            concurrency,
        } => {
            let config = Arc::new(load_config(config.as_deref())?);
            let total = files.len();

            let bar = IndicatifProgress::documents_bar(
                &multi,
                "Reading dates",
                u64::try_from(total).unwrap_or(u64::MAX),
            );
            let outcomes = pipeline::process_documents(
                files,
                config,
                concurrency,
                &bar,
                pipeline::document_date,
            )
            .await;

            let mut failed = 0_usize;
            let mut lines = Vec::with_capacity(outcomes.len());
            for outcome in outcomes {
                match outcome.result {
                    Ok(date) => {
                        let date = date.map_or_else(|| "-".to_owned(), |d| d.to_string());
                        lines.push(format!("{}\t{date}", outcome.path.display()));
                    }
                    Err(e) => {
                        failed += 1;
                        log::error!("Failed to read {}: {e}", outcome.path.display());
                    }
                }
            }

            bar.finish(format!("Read {} date(s), {failed} failure(s)", lines.len()));
            for line in &lines {
                println!("{line}");
            }

            if failed == total {
                return Err(format!("all {total} document(s) failed").into());
            }
        }
        Commands::Config => {
            print!("{}", ExtractionConfig::default().to_toml_string()?);
        }
    }

    Ok(())
}
