//! Command-line flags and their conversion into a pipeline config

use crate::catalog::{CatalogConfig, DEFAULT_CATALOG_URL, DEFAULT_PAGE_SIZE};
use crate::core::filter::TransactionFilter;
use crate::pipeline::{PipelineConfig, DEFAULT_ENRICHED_OUTPUT, DEFAULT_INPUT, DEFAULT_REPORT};
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Analyze a pipe-delimited sales file and enrich it from a product catalog
#[derive(Parser, Debug)]
#[command(name = "sales-analytics")]
#[command(
    about = "Analyze a pipe-delimited sales file and enrich it from a product catalog",
    long_about = None
)]
pub struct CliArgs {
    /// Sales data file to analyze
    #[arg(long = "input", value_name = "PATH", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Where to write the enriched transactions
    #[arg(
        long = "enriched-output",
        value_name = "PATH",
        default_value = DEFAULT_ENRICHED_OUTPUT
    )]
    pub enriched_output: PathBuf,

    /// Where to write the text report
    #[arg(long = "report", value_name = "PATH", default_value = DEFAULT_REPORT)]
    pub report: PathBuf,

    /// Product catalog listing endpoint
    #[arg(
        long = "catalog-url",
        value_name = "URL",
        env = "SALES_CATALOG_URL",
        default_value = DEFAULT_CATALOG_URL
    )]
    pub catalog_url: String,

    /// Products requested per catalog page
    #[arg(
        long = "page-size",
        value_name = "SIZE",
        help = "Products per catalog page (default: 100)"
    )]
    pub page_size: Option<usize>,

    /// Only analyze transactions from this region (case-insensitive)
    #[arg(long = "region", value_name = "REGION")]
    pub region: Option<String>,

    /// Only analyze transactions of at least this amount
    #[arg(long = "min-amount", value_name = "AMOUNT")]
    pub min_amount: Option<Decimal>,

    /// Only analyze transactions of at most this amount
    #[arg(long = "max-amount", value_name = "AMOUNT")]
    pub max_amount: Option<Decimal>,

    /// Revenue share (percent) under which a product is a low performer
    #[arg(
        long = "low-share-pct",
        value_name = "PCT",
        help = "Low performer revenue share threshold in percent (default: 5, range: 0-100)"
    )]
    pub low_share_pct: Option<Decimal>,
}

impl CliArgs {
    /// Build a PipelineConfig from the parsed flags
    ///
    /// Unset flags keep their defaults. Invalid values (page size 0, a
    /// threshold outside 0–100) are logged and replaced by the default.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        let catalog = CatalogConfig::new(
            self.catalog_url.clone(),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        );

        let filter = TransactionFilter {
            region: self.region.clone(),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        };

        let config = PipelineConfig {
            input_path: self.input.clone(),
            enriched_output_path: self.enriched_output.clone(),
            report_path: self.report.clone(),
            catalog,
            ..PipelineConfig::default()
        }
        .with_filter(filter);

        match self.low_share_pct {
            Some(pct) => config.with_low_share_pct(pct),
            None => config,
        }
    }
}
