//! Product catalog types
//!
//! [`CatalogProduct`] and [`CatalogPage`] mirror the JSON returned by the
//! catalog API. [`CatalogEntry`] is the slimmed record kept in the
//! product mapping.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Numeric catalog product identifier
pub type CatalogId = u32;

/// One product as returned by the catalog API
///
/// Only `id` is required; everything else is optional so a sparse catalog
/// still deserializes. A missing or null `title` becomes an empty name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogProduct {
    pub id: CatalogId,

    #[serde(rename = "title", alias = "name", default, deserialize_with = "null_as_empty")]
    pub name: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub price: Option<Decimal>,

    #[serde(default)]
    pub rating: Option<Decimal>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of the catalog listing
///
/// `total` is the size of the whole catalog. A response without it is
/// treated as the only page.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub products: Vec<CatalogProduct>,

    #[serde(default)]
    pub total: Option<usize>,
}

/// Catalog metadata kept per product id
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<Decimal>,
    pub rating: Option<Decimal>,
}

impl From<CatalogProduct> for CatalogEntry {
    fn from(product: CatalogProduct) -> Self {
        CatalogEntry {
            name: product.name,
            category: product.category,
            brand: product.brand,
            price: product.price,
            rating: product.rating,
        }
    }
}

/// Outcome of the catalog fetch for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStatus {
    /// The listing was fetched; `products` unique ids were mapped
    Available { products: usize },
    /// The fetch failed and enrichment ran against an empty mapping
    Unavailable { reason: String },
}

impl CatalogStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, CatalogStatus::Available { .. })
    }
}

impl fmt::Display for CatalogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogStatus::Available { products } => {
                write!(f, "available ({products} products)")
            }
            CatalogStatus::Unavailable { reason } => write!(f, "unavailable ({reason})"),
        }
    }
}
