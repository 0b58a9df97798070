//! Types module
//!
//! Contains core data structures used throughout the application:
//! - `transaction`: validated and enriched sales records
//! - `catalog`: product catalog wire types and mapping entries
//! - `analytics`: aggregate results consumed by the report
//! - `error`: error types for the pipeline

pub mod analytics;
pub mod catalog;
pub mod error;
pub mod transaction;

pub use analytics::{
    CustomerStats, DailyStats, ProductStats, RegionStats, ReportSections, SummaryStats,
};
pub use catalog::{CatalogEntry, CatalogId, CatalogPage, CatalogProduct, CatalogStatus};
pub use error::{SalesError, ValidationError};
pub use transaction::{EnrichedTransaction, TotalStatus, Transaction};
