//! Pipeline orchestration
//!
//! Runs the stages in order:
//!
//! ```text
//! load → parse → filter → analytics → catalog → enrich → enriched dump → report
//! ```
//!
//! Invalid records are dropped and counted. A catalog failure is logged and
//! enrichment continues against an empty mapping, so every record comes out
//! unmatched. File errors and an empty validated set abort the run.

mod config;

pub use config::{PipelineConfig, DEFAULT_ENRICHED_OUTPUT, DEFAULT_INPUT, DEFAULT_REPORT};

use crate::catalog::CatalogClient;
use crate::core::analytics::AnalyticsEngine;
use crate::core::enricher::{enrich, summarize};
use crate::core::filter::log_filter_options;
use crate::core::product_mapping::ProductMapping;
use crate::core::traits::CatalogSource;
use crate::io::loader::{load_lines, SourceEncoding};
use crate::io::pipe_format::{parse_transactions, save_enriched};
use crate::io::report::{save_report, ReportContext};
use crate::types::{CatalogStatus, SalesError};
use chrono::Local;
use tracing::{info, warn};

/// Counts from a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub encoding: SourceEncoding,
    /// Data lines read from the input file
    pub records_read: usize,
    pub valid: usize,
    pub invalid: usize,
    pub corrected_totals: usize,
    /// Records left after filtering, the set everything downstream sees
    pub analyzed: usize,
    pub matched: usize,
    pub catalog: CatalogStatus,
}

/// The sales pipeline
pub struct Pipeline {
    config: PipelineConfig,
    catalog: Box<dyn CatalogSource>,
}

impl Pipeline {
    /// Create a pipeline that fetches the catalog over HTTP
    pub fn new(config: PipelineConfig) -> Self {
        let catalog = Box::new(CatalogClient::new(config.catalog.clone()));
        Self { config, catalog }
    }

    /// Create a pipeline with a custom catalog source
    pub fn with_catalog(config: PipelineConfig, catalog: Box<dyn CatalogSource>) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn load_catalog(&self) -> (ProductMapping, CatalogStatus) {
        match self.catalog.fetch_products() {
            Ok(products) => {
                let mapping = ProductMapping::from_products(products);
                let status = CatalogStatus::Available {
                    products: mapping.len(),
                };
                (mapping, status)
            }
            Err(e) => {
                warn!(error = %e, "catalog unavailable, continuing without enrichment");
                let status = CatalogStatus::Unavailable {
                    reason: e.to_string(),
                };
                (ProductMapping::new(), status)
            }
        }
    }

    /// Run every stage and write both outputs
    ///
    /// # Errors
    ///
    /// - [`SalesError::FileAccess`] if the input cannot be read or an output
    ///   cannot be written
    /// - [`SalesError::Computation`] if no record survives validation and
    ///   filtering, or an aggregate overflows
    pub fn run(&self) -> Result<RunSummary, SalesError> {
        let config = &self.config;

        let loaded = load_lines(&config.input_path)?;
        let records_read = loaded.lines.len();

        let outcome = parse_transactions(&loaded.lines);
        let valid = outcome.transactions.len();
        let invalid = outcome.invalid_count();
        let corrected_totals = outcome.corrected_totals;
        info!(records_read, valid, invalid, corrected_totals, "records validated");

        log_filter_options(&outcome.transactions);
        let (transactions, filter_summary) = config.filter.apply(outcome.transactions);
        if config.filter.is_active() {
            info!(
                by_region = filter_summary.filtered_by_region,
                by_amount = filter_summary.filtered_by_amount,
                remaining = filter_summary.final_count,
                "filters applied"
            );
        }

        let sections = AnalyticsEngine::new(config.low_share_pct).compute(&transactions)?;
        info!(
            total_revenue = %sections.summary.total_revenue,
            regions = sections.regions.len(),
            "analytics computed"
        );

        let (mapping, catalog) = self.load_catalog();
        let enriched = enrich(&transactions, &mapping);
        let enrichment = summarize(&enriched);
        info!(
            matched = enrichment.matched,
            unmatched = enrichment.unmatched,
            "transactions enriched"
        );

        save_enriched(&config.enriched_output_path, &enriched)?;
        info!(path = %config.enriched_output_path.display(), "enriched data written");

        let ctx = ReportContext {
            transactions: &transactions,
            enriched: &enriched,
            sections: &sections,
            invalid_count: invalid,
            corrected_totals,
            filter: config.filter.is_active().then_some(filter_summary),
            catalog: &catalog,
            generated_at: Local::now().naive_local(),
        };
        save_report(&config.report_path, &ctx)?;

        Ok(RunSummary {
            encoding: loaded.encoding,
            records_read,
            valid,
            invalid,
            corrected_totals,
            analyzed: transactions.len(),
            matched: enrichment.matched,
            catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::TransactionFilter;
    use crate::types::CatalogProduct;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const INPUT: &str = "\
TransactionID|Date|Region|ProductID|ProductName|CustomerID|Quantity|UnitPrice|TotalAmount
T001|2024-01-05|North|P101|Widget|C001|3|10.00|30.00
T002|2024-01-05|South|P102|Gadget|C002|1|1,250.50|1,250.50
T003|2024-01-06|North|P101|Widget|C003|0|10.00|0.00
T004|2024-01-07|East|P103|Bolt|C001|4|0.25|9.99
";

    struct FailingCatalog;

    impl CatalogSource for FailingCatalog {
        fn fetch_products(&self) -> Result<Vec<CatalogProduct>, SalesError> {
            Err(SalesError::network("connection refused"))
        }
    }

    fn catalog() -> Vec<CatalogProduct> {
        vec![CatalogProduct {
            id: 101,
            name: "Essence Mascara".to_string(),
            category: Some("beauty".to_string()),
            brand: Some("Essence".to_string()),
            price: None,
            rating: None,
        }]
    }

    fn config_in(dir: &Path) -> PipelineConfig {
        let input_path = dir.join("sales_data.txt");
        fs::write(&input_path, INPUT).unwrap();
        PipelineConfig {
            input_path,
            enriched_output_path: dir.join("data").join("enriched.txt"),
            report_path: dir.join("output").join("report.txt"),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_run_writes_both_outputs() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let pipeline = Pipeline::with_catalog(config.clone(), Box::new(catalog()));

        let summary = pipeline.run().unwrap();

        assert_eq!(summary.records_read, 4);
        assert_eq!(summary.valid, 3);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.corrected_totals, 1);
        assert_eq!(summary.analyzed, 3);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.catalog, CatalogStatus::Available { products: 1 });

        let enriched = fs::read_to_string(&config.enriched_output_path).unwrap();
        assert_eq!(enriched.lines().count(), 4);
        assert!(enriched.contains("Essence Mascara|beauty|Essence|||true"));

        let report = fs::read_to_string(&config.report_path).unwrap();
        assert!(report.contains("Invalid Records Skipped: 1"));
        assert!(report.contains("Total Revenue:        ₹1,281.50"));
    }

    #[test]
    fn test_run_degrades_when_catalog_fails() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let pipeline = Pipeline::with_catalog(config.clone(), Box::new(FailingCatalog));

        let summary = pipeline.run().unwrap();

        assert_eq!(summary.matched, 0);
        assert!(!summary.catalog.is_available());

        let enriched = fs::read_to_string(&config.enriched_output_path).unwrap();
        assert!(enriched.lines().skip(1).all(|line| line.ends_with("|false")));

        let report = fs::read_to_string(&config.report_path).unwrap();
        assert!(report.contains("unavailable (Network error: connection refused)"));
    }

    #[test]
    fn test_run_applies_filter() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path()).with_filter(TransactionFilter {
            region: Some("north".to_string()),
            ..TransactionFilter::default()
        });
        let pipeline = Pipeline::with_catalog(config.clone(), Box::new(catalog()));

        let summary = pipeline.run().unwrap();

        assert_eq!(summary.valid, 3);
        assert_eq!(summary.analyzed, 1);

        let report = fs::read_to_string(&config.report_path).unwrap();
        assert!(report.contains("Filtered Out: 2 by region, 0 by amount"));
    }

    #[test]
    fn test_filter_leaving_nothing_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path()).with_filter(TransactionFilter {
            region: Some("Mars".to_string()),
            ..TransactionFilter::default()
        });
        let pipeline = Pipeline::with_catalog(config.clone(), Box::new(catalog()));

        let err = pipeline.run().unwrap_err();

        assert!(matches!(err, SalesError::Computation { .. }));
        assert!(!config.report_path.exists());
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig {
            input_path: dir.path().join("nope.txt"),
            ..config_in(dir.path())
        };
        let pipeline = Pipeline::with_catalog(config, Box::new(catalog()));

        let err = pipeline.run().unwrap_err();

        assert!(matches!(err, SalesError::FileAccess { .. }));
        assert!(err.is_fatal());
    }
}
