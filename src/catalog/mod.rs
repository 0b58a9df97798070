//! Product catalog access
//!
//! - `client` - Paginated HTTP client for the catalog API

pub mod client;

pub use client::CatalogClient;

use tracing::warn;

/// Public product catalog used when no URL is configured
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products";

/// Products requested per page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Where and how to fetch the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Listing endpoint, queried with `limit` and `skip`
    pub base_url: String,
    pub page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogConfig {
    /// Create a config, falling back to the default page size for 0
    pub fn new(base_url: impl Into<String>, page_size: usize) -> Self {
        let page_size = if page_size == 0 {
            warn!(
                page_size,
                default = DEFAULT_PAGE_SIZE,
                "invalid catalog page size, using default"
            );
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };

        Self {
            base_url: base_url.into(),
            page_size,
        }
    }
}
