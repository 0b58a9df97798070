//! Sales Analytics Library
//! # Overview
//!
//! This library turns a pipe-delimited sales file into validated
//! transactions, aggregate analytics, a catalog-enriched data dump and a
//! text report.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transaction, catalog records, aggregates, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::filter`] - Optional region and amount filters
//!   - [`core::analytics`] - Revenue, region, product, customer and daily aggregates
//!   - [`core::product_mapping`] - Catalog lookup keyed by numeric product id
//!   - [`core::enricher`] - Catalog join and match summary
//! - [`catalog`] - Paginated HTTP client for the product catalog
//! - [`io`] - File loading, record parsing, enriched output and the report
//! - [`pipeline`] - Stage orchestration and degradation policy
//!
//! # Record Handling
//!
//! - **Invalid records** are dropped, logged and counted; they never abort a run
//! - **Declared totals** are recomputed as quantity × unit price
//! - **Catalog failures** leave every transaction unmatched; the report still renders
//! - **File errors** and an empty validated set are fatal

// Module declarations
pub mod catalog;
pub mod cli;
pub mod core;
pub mod io;
pub mod pipeline;
pub mod types;

pub use catalog::{CatalogClient, CatalogConfig};
pub use crate::core::{AnalyticsEngine, CatalogSource, ProductMapping, TransactionFilter};
pub use pipeline::{Pipeline, PipelineConfig, RunSummary};
pub use types::{
    CatalogProduct, CatalogStatus, EnrichedTransaction, ReportSections, SalesError, TotalStatus,
    Transaction, ValidationError,
};
