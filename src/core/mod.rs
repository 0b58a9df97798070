//! Core business logic module
//!
//! This module contains the transformation stages of the pipeline:
//! - `traits` - Trait abstraction over the product catalog
//! - `filter` - Optional region / amount filters
//! - `analytics` - Aggregates over the validated set
//! - `product_mapping` - Id-keyed catalog lookup
//! - `enricher` - Catalog join and match summary

pub mod analytics;
pub mod enricher;
pub mod filter;
pub mod product_mapping;
pub mod traits;

pub use analytics::AnalyticsEngine;
pub use enricher::{enrich, summarize, EnrichmentSummary};
pub use filter::{FilterSummary, TransactionFilter};
pub use product_mapping::ProductMapping;
pub use traits::CatalogSource;
