//! Transaction enrichment
//!
//! Joins each transaction to the catalog by the numeric suffix of its
//! product id (`P101` → `101`). A miss, including an id with no usable
//! numeric part, simply leaves the transaction unmatched.

use crate::core::product_mapping::ProductMapping;
use crate::types::{CatalogId, EnrichedTransaction, Transaction};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Extract the numeric catalog id from a product identifier
///
/// Leading ASCII letters are stripped; what remains must be one or more
/// ASCII digits that fit in a [`CatalogId`].
///
/// ```
/// use sales_analytics::core::enricher::extract_numeric_id;
///
/// assert_eq!(extract_numeric_id("P101"), Some(101));
/// assert_eq!(extract_numeric_id("P-1"), None);
/// ```
pub fn extract_numeric_id(product_id: &str) -> Option<CatalogId> {
    let digits = product_id.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Enrich a single transaction
pub fn enrich_one(transaction: &Transaction, mapping: &ProductMapping) -> EnrichedTransaction {
    let entry = extract_numeric_id(&transaction.product_id).and_then(|id| mapping.get(id));

    match entry {
        Some(entry) => EnrichedTransaction {
            transaction: transaction.clone(),
            api_product_name: Some(entry.name.clone()).filter(|name| !name.is_empty()),
            api_category: entry.category.clone(),
            api_brand: entry.brand.clone(),
            api_price: entry.price,
            api_rating: entry.rating,
            api_match: true,
        },
        None => EnrichedTransaction::unmatched(transaction.clone()),
    }
}

/// Enrich every transaction, preserving order
pub fn enrich(transactions: &[Transaction], mapping: &ProductMapping) -> Vec<EnrichedTransaction> {
    transactions
        .iter()
        .map(|transaction| enrich_one(transaction, mapping))
        .collect()
}

/// Match statistics for the report
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Percentage of matched records, 0 for an empty input
    pub match_rate_pct: Decimal,
    /// Distinct names of products that found no catalog entry, sorted
    pub unmatched_products: Vec<String>,
}

/// Summarize match results
pub fn summarize(enriched: &[EnrichedTransaction]) -> EnrichmentSummary {
    let total = enriched.len();
    let matched = enriched.iter().filter(|e| e.api_match).count();

    let unmatched_products: BTreeSet<&str> = enriched
        .iter()
        .filter(|e| !e.api_match)
        .map(|e| e.transaction.product_name.as_str())
        .collect();

    let match_rate_pct = if total == 0 {
        Decimal::ZERO
    } else {
        // matched <= total, so the ratio never exceeds one
        Decimal::from(matched) / Decimal::from(total) * Decimal::ONE_HUNDRED
    };

    EnrichmentSummary {
        total,
        matched,
        unmatched: total - matched,
        match_rate_pct,
        unmatched_products: unmatched_products.into_iter().map(str::to_string).collect(),
    }
}
