//! Core traits
//!
//! The pipeline talks to the product catalog through [`CatalogSource`] so
//! the HTTP client can be swapped for a fixed listing in tests and offline
//! runs.

use crate::types::{CatalogProduct, SalesError};

/// Source of catalog products for enrichment
pub trait CatalogSource {
    /// Fetch the full product listing
    ///
    /// Failures should be reported as [`SalesError::Network`]; the pipeline
    /// treats them as a degraded catalog, not a fatal error.
    fn fetch_products(&self) -> Result<Vec<CatalogProduct>, SalesError>;
}

/// A catalog held in memory
impl CatalogSource for Vec<CatalogProduct> {
    fn fetch_products(&self) -> Result<Vec<CatalogProduct>, SalesError> {
        Ok(self.clone())
    }
}
