//! Pipeline run configuration and its validation

use crate::catalog::CatalogConfig;
use crate::core::analytics::DEFAULT_LOW_SHARE_PCT;
use crate::core::filter::TransactionFilter;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_INPUT: &str = "data/sales_data.txt";
pub const DEFAULT_ENRICHED_OUTPUT: &str = "data/enriched_sales_data.txt";
pub const DEFAULT_REPORT: &str = "output/sales_report.txt";

/// Configuration for one pipeline run
///
/// The default is exactly what a run without flags uses.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub enriched_output_path: PathBuf,
    pub report_path: PathBuf,
    pub catalog: CatalogConfig,
    pub filter: TransactionFilter,
    /// Revenue share (percent) under which a product is a low performer
    pub low_share_pct: Decimal,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            enriched_output_path: PathBuf::from(DEFAULT_ENRICHED_OUTPUT),
            report_path: PathBuf::from(DEFAULT_REPORT),
            catalog: CatalogConfig::default(),
            filter: TransactionFilter::default(),
            low_share_pct: DEFAULT_LOW_SHARE_PCT,
        }
    }
}

impl PipelineConfig {
    /// Set the low performer threshold
    ///
    /// Values outside 0–100 fall back to the default with a warning.
    pub fn with_low_share_pct(mut self, low_share_pct: Decimal) -> Self {
        self.low_share_pct = if low_share_pct.is_sign_negative() || low_share_pct > Decimal::ONE_HUNDRED
        {
            warn!(
                %low_share_pct,
                default = %DEFAULT_LOW_SHARE_PCT,
                "invalid low performer threshold, using default"
            );
            DEFAULT_LOW_SHARE_PCT
        } else {
            low_share_pct
        };
        self
    }

    /// Set the record filter
    ///
    /// A minimum above the maximum is kept as given (it matches nothing) but
    /// is called out in the log.
    pub fn with_filter(mut self, filter: TransactionFilter) -> Self {
        if let (Some(min), Some(max)) = (filter.min_amount, filter.max_amount) {
            if min > max {
                warn!(%min, %max, "minimum amount exceeds maximum, no record can match");
            }
        }
        self.filter = filter;
        self
    }
}
