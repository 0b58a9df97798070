//! Aggregate results produced by the analytics engine
//!
//! Everything here is computed once from the validated transaction set and
//! then only read by the report generator.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Overall totals for the validated set
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub total_revenue: Decimal,
    pub transaction_count: usize,
    pub average_order_value: Decimal,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// Revenue and volume for one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionStats {
    pub region: String,
    pub transaction_count: usize,
    pub revenue: Decimal,
    /// Percentage of total revenue (0–100, unrounded)
    pub share_pct: Decimal,
}

impl RegionStats {
    /// Average transaction value in this region
    pub fn average_value(&self) -> Decimal {
        if self.transaction_count == 0 {
            return Decimal::ZERO;
        }
        self.revenue / Decimal::from(self.transaction_count)
    }
}

/// Sales of one product, keyed by product id
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStats {
    pub product_id: String,
    /// First name seen for this product id
    pub product_name: String,
    pub quantity: u64,
    pub revenue: Decimal,
}

/// Purchases of one customer
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerStats {
    pub customer_id: String,
    pub order_count: usize,
    pub total_spent: Decimal,
    pub average_order_value: Decimal,
    pub distinct_products: usize,
}

/// Activity on one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub transaction_count: usize,
    pub unique_customers: usize,
}

/// Every section the report needs, in report order
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSections {
    pub summary: SummaryStats,
    /// Ordered by revenue, highest first
    pub regions: Vec<RegionStats>,
    pub top_products: Vec<ProductStats>,
    pub top_customers: Vec<CustomerStats>,
    /// Chronological
    pub daily_trend: Vec<DailyStats>,
    pub peak_day: DailyStats,
    /// Ordered by revenue, lowest first
    pub low_performers: Vec<ProductStats>,
}
