//! HTTP catalog client
//!
//! Walks the listing with `limit`/`skip` until `skip` reaches the reported
//! `total`, a page comes back empty, or [`MAX_PAGES`] pages were read.
//! Any transport, status or decoding failure aborts the whole fetch with
//! [`SalesError::Network`]; a partial catalog is never returned.

use crate::catalog::CatalogConfig;
use crate::core::traits::CatalogSource;
use crate::types::{CatalogPage, CatalogProduct, SalesError};
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound on pages fetched in one run
pub const MAX_PAGES: usize = 1000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("sales-analytics/", env!("CARGO_PKG_VERSION"));

/// Blocking client for a DummyJSON-style product listing
#[derive(Debug, Clone)]
pub struct CatalogClient {
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn fetch_page(
        &self,
        http: &reqwest::blocking::Client,
        skip: usize,
    ) -> Result<CatalogPage, SalesError> {
        let limit = self.config.page_size.to_string();
        let skip_param = skip.to_string();

        let resp = http
            .get(&self.config.base_url)
            .query(&[("limit", limit.as_str()), ("skip", skip_param.as_str())])
            .send()
            .map_err(|e| SalesError::network(format!("request to catalog failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SalesError::network(format!(
                "catalog returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| SalesError::network(format!("failed to read catalog response: {e}")))?;

        serde_json::from_str(&body)
            .map_err(|e| SalesError::network(format!("invalid catalog response: {e}")))
    }
}

impl CatalogSource for CatalogClient {
    fn fetch_products(&self) -> Result<Vec<CatalogProduct>, SalesError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SalesError::network(format!("failed to build HTTP client: {e}")))?;

        let mut products = Vec::new();
        let mut skip = 0;

        for page_number in 1..=MAX_PAGES {
            let page = self.fetch_page(&http, skip)?;
            let received = page.products.len();
            debug!(page = page_number, skip, received, "catalog page fetched");

            if received == 0 {
                break;
            }
            products.extend(page.products);
            skip += received;

            match page.total {
                Some(total) if skip < total => continue,
                _ => break,
            }
        }

        info!(
            products = products.len(),
            url = %self.config.base_url,
            "catalog fetched"
        );
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn client_for(server: &MockServer, page_size: usize) -> CatalogClient {
        CatalogClient::new(CatalogConfig {
            base_url: server.url("/products"),
            page_size,
        })
    }

    fn product(id: u32, title: &str) -> serde_json::Value {
        json!({ "id": id, "title": title, "category": "misc", "price": 9.99, "rating": 4.5 })
    }

    #[test]
    fn test_single_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/products")
                .query_param("limit", "100")
                .query_param("skip", "0");
            then.status(200).json_body(json!({
                "products": [
                    {
                        "id": 1,
                        "title": "Essence Mascara",
                        "category": "beauty",
                        "brand": "Essence",
                        "price": 9.99,
                        "rating": 4.94
                    },
                    { "id": 2, "title": "Eyeshadow Palette" }
                ],
                "total": 2,
                "skip": 0,
                "limit": 100
            }));
        });

        let products = client_for(&server, 100).fetch_products().unwrap();

        mock.assert();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Essence Mascara");
        assert_eq!(products[0].brand.as_deref(), Some("Essence"));
        assert_eq!(products[0].price, Some(Decimal::new(999, 2)));
        assert_eq!(products[1].category, None);
    }

    #[test]
    fn test_pagination_follows_skip_until_total() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET).path("/products").query_param("skip", "0");
            then.status(200).json_body(json!({
                "products": [product(1, "A"), product(2, "B")],
                "total": 5
            }));
        });
        let second = server.mock(|when, then| {
            when.method(GET).path("/products").query_param("skip", "2");
            then.status(200).json_body(json!({
                "products": [product(3, "C"), product(4, "D")],
                "total": 5
            }));
        });
        let third = server.mock(|when, then| {
            when.method(GET).path("/products").query_param("skip", "4");
            then.status(200).json_body(json!({
                "products": [product(5, "E")],
                "total": 5
            }));
        });

        let products = client_for(&server, 2).fetch_products().unwrap();

        first.assert();
        second.assert();
        third.assert();
        let ids: Vec<u32> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_missing_total_reads_one_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(200)
                .json_body(json!({ "products": [product(7, "Lamp")] }));
        });

        let products = client_for(&server, 1).fetch_products().unwrap();

        mock.assert_calls(1);
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn test_untitled_product_does_not_drop_the_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(200).json_body(json!({
                "products": [
                    product(1, "A"),
                    { "id": 2, "category": "y" }
                ],
                "total": 2
            }));
        });

        let products = client_for(&server, 100).fetch_products().unwrap();

        mock.assert_calls(1);
        let ids: Vec<u32> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(products[1].name, "");
        assert_eq!(products[1].category.as_deref(), Some("y"));
    }

    #[test]
    fn test_empty_page_stops() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(200)
                .json_body(json!({ "products": [], "total": 50 }));
        });

        let products = client_for(&server, 10).fetch_products().unwrap();

        mock.assert_calls(1);
        assert!(products.is_empty());
    }

    #[test]
    fn test_server_error_is_network_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(500).body("boom");
        });

        let err = client_for(&server, 100).fetch_products().unwrap_err();

        assert!(matches!(err, SalesError::Network { .. }));
        assert!(err.to_string().contains("500"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_malformed_body_is_network_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(200).body("not json");
        });

        let err = client_for(&server, 100).fetch_products().unwrap_err();
        assert!(matches!(err, SalesError::Network { .. }));
    }

    #[test]
    fn test_connection_refused_is_network_error() {
        let client = CatalogClient::new(CatalogConfig {
            base_url: "http://127.0.0.1:1/products".to_string(),
            page_size: 10,
        });

        let err = client.fetch_products().unwrap_err();
        assert!(matches!(err, SalesError::Network { .. }));
    }
}
