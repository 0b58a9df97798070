//! Sales Analytics CLI
//!
//! Reads a pipe-delimited sales file, validates and analyzes it, enriches
//! every transaction from a product catalog API and writes an enriched data
//! file plus a text report.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --input data/sales_data.txt --report output/sales_report.txt
//! cargo run -- --region North --min-amount 1000
//! RUST_LOG=debug cargo run -- --catalog-url http://localhost:8080/products
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success (including runs where the catalog was unavailable)
//! - 1: Fatal error (unreadable input, unwritable output, nothing to analyze)

use sales_analytics::cli;
use sales_analytics::pipeline::Pipeline;
use std::process;
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();
    let pipeline = Pipeline::new(args.to_pipeline_config());

    match pipeline.run() {
        Ok(summary) => {
            info!(
                valid = summary.valid,
                invalid = summary.invalid,
                matched = summary.matched,
                catalog = %summary.catalog,
                report = %pipeline.config().report_path.display(),
                "pipeline complete"
            );
        }
        Err(e) => {
            error!(error = %e, "pipeline failed");
            process::exit(1);
        }
    }
}
