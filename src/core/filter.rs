//! Optional filters over the validated set
//!
//! All filters are off by default, in which case the set passes through
//! untouched. Region matching ignores ASCII case; amount bounds are
//! inclusive and compare against `total_amount`.

use crate::types::Transaction;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::info;

/// Filters selected by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub region: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

/// What each filter removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub total_input: usize,
    pub filtered_by_region: usize,
    pub filtered_by_amount: usize,
    pub final_count: usize,
}

impl TransactionFilter {
    pub fn is_active(&self) -> bool {
        self.region.is_some() || self.min_amount.is_some() || self.max_amount.is_some()
    }

    fn region_matches(&self, transaction: &Transaction) -> bool {
        self.region
            .as_deref()
            .is_none_or(|region| transaction.region.eq_ignore_ascii_case(region))
    }

    fn amount_in_range(&self, transaction: &Transaction) -> bool {
        let amount = transaction.total_amount;
        self.min_amount.is_none_or(|min| amount >= min)
            && self.max_amount.is_none_or(|max| amount <= max)
    }

    /// Apply the filters, region first, then amount
    pub fn apply(&self, transactions: Vec<Transaction>) -> (Vec<Transaction>, FilterSummary) {
        let total_input = transactions.len();

        let by_region: Vec<Transaction> = transactions
            .into_iter()
            .filter(|tx| self.region_matches(tx))
            .collect();
        let filtered_by_region = total_input - by_region.len();

        let after_region = by_region.len();
        let kept: Vec<Transaction> = by_region
            .into_iter()
            .filter(|tx| self.amount_in_range(tx))
            .collect();
        let filtered_by_amount = after_region - kept.len();

        let summary = FilterSummary {
            total_input,
            filtered_by_region,
            filtered_by_amount,
            final_count: kept.len(),
        };
        (kept, summary)
    }
}

/// Log the regions and amount range a user could filter on
pub fn log_filter_options(transactions: &[Transaction]) {
    let regions: BTreeSet<&str> = transactions.iter().map(|tx| tx.region.as_str()).collect();
    let min = transactions.iter().map(|tx| tx.total_amount).min();
    let max = transactions.iter().map(|tx| tx.total_amount).max();

    if let (Some(min), Some(max)) = (min, max) {
        info!(
            regions = %regions.into_iter().collect::<Vec<_>>().join(", "),
            %min,
            %max,
            "filter options available"
        );
    }
}
