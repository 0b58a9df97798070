//! Transaction-related types
//!
//! A [`Transaction`] is one validated sales record. An
//! [`EnrichedTransaction`] wraps a copy of it together with whatever the
//! product catalog knew about its product.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Outcome of the total-amount cross-check for a record
///
/// The stored `total_amount` is always quantity × unit_price; this records
/// how it relates to what the input file declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalStatus {
    /// The input layout carried no total; it was computed
    Computed,

    /// The declared total equals quantity × unit_price
    Matched,

    /// The declared total disagreed and was replaced
    Corrected {
        /// Total as it appeared in the file
        declared: Decimal,
    },
}

/// One validated sales record
///
/// Invariants (enforced by the parser): `quantity > 0`, `unit_price > 0`,
/// identifiers and region non-empty, `total_amount == quantity * unit_price`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Transaction identifier, e.g. `T001`
    pub id: String,

    /// Sale date
    pub date: NaiveDate,

    /// Sales region
    pub region: String,

    /// Product identifier, e.g. `P101`
    pub product_id: String,

    /// Product name with punctuation noise removed
    pub product_name: String,

    /// Customer identifier, e.g. `C001`
    pub customer_id: String,

    /// Units sold
    pub quantity: u32,

    /// Price per unit
    pub unit_price: Decimal,

    /// quantity × unit_price
    pub total_amount: Decimal,

    /// Cross-check result for `total_amount`
    pub total_status: TotalStatus,
}

/// A transaction annotated with catalog metadata
///
/// `api_match` is false and every `api_*` field is `None` when the catalog
/// had no entry for the transaction's numeric product id.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub api_product_name: Option<String>,
    pub api_category: Option<String>,
    pub api_brand: Option<String>,
    pub api_price: Option<Decimal>,
    pub api_rating: Option<Decimal>,
    pub api_match: bool,
}

impl EnrichedTransaction {
    /// Wrap a transaction with no catalog match
    pub fn unmatched(transaction: Transaction) -> Self {
        EnrichedTransaction {
            transaction,
            api_product_name: None,
            api_category: None,
            api_brand: None,
            api_price: None,
            api_rating: None,
            api_match: false,
        }
    }
}
