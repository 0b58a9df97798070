//! Product mapping for enrichment
//!
//! This module provides the ProductMapping component: a lookup from numeric
//! catalog id to the catalog metadata for that product. It is built once per
//! run from the catalog listing and only read afterwards.
//!
//! # Duplicate Handling
//!
//! If the catalog lists the same id more than once, only the first
//! occurrence is stored. Later entries with the same id are ignored.

use crate::types::{CatalogEntry, CatalogId, CatalogProduct};
use std::collections::HashMap;
use tracing::debug;

/// Id-keyed catalog lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductMapping {
    entries: HashMap<CatalogId, CatalogEntry>,
}

impl ProductMapping {
    /// Create an empty mapping
    ///
    /// An empty mapping is what enrichment runs against when the catalog is
    /// unavailable: every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from a catalog listing
    pub fn from_products(products: impl IntoIterator<Item = CatalogProduct>) -> Self {
        let mut mapping = Self::new();
        for product in products {
            let id = product.id;
            if !mapping.insert(id, product.into()) {
                debug!(id, "duplicate catalog id ignored");
            }
        }
        mapping
    }

    /// Store an entry unless the id is already present
    ///
    /// # Returns
    ///
    /// `true` if the entry was stored, `false` if the id was already mapped
    pub fn insert(&mut self, id: CatalogId, entry: CatalogEntry) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, entry);
        true
    }

    pub fn get(&self, id: CatalogId) -> Option<&CatalogEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
