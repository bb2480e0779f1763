//! Shared test fixtures and utilities for integration tests.
//!
//! Each test gets its own temporary catalog file and its own [`SearchState`],
//! so vocabulary caches never leak between tests.
//!
//! # Available Fixtures
//!
//! - `storefront`: a small electronics and apparel catalog on disk
//! - `empty_storefront`: a catalog file holding an empty array

use rstest::fixture;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storefront_search::{Config, JsonCatalog, SearchState};
use tempfile::TempDir;

/// A catalog JSON file in a temp directory, removed on drop.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempCatalog {
    _temp: TempDir,
    path: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempCatalog {
    /// Writes `products` as a JSON array to a fresh temp file.
    pub fn new(products: &serde_json::Value) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("catalog.json");
        let catalog = Self { _temp: temp, path };
        catalog.write(products);
        catalog
    }

    /// Replaces the catalog contents.
    pub fn write(&self, products: &serde_json::Value) {
        let content = serde_json::to_string_pretty(products).expect("Failed to encode catalog");
        std::fs::write(&self.path, content).expect("Failed to write catalog");
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Search state reading this file with default config.
    pub fn state(&self) -> SearchState {
        self.state_with(Config::default())
    }

    /// Search state reading this file with `config`.
    pub fn state_with(&self, config: Config) -> SearchState {
        SearchState::new(Arc::new(JsonCatalog::new(&self.path)), config)
    }
}

/// A catalog and the state searching it.
pub struct Storefront {
    pub catalog: TempCatalog,
    pub state: SearchState,
}

pub fn sample_products() -> serde_json::Value {
    json!([
        {
            "id": "p1",
            "title": "Gaming Laptop 15",
            "brand": "Acme",
            "categories": [{ "name": "Laptops" }, { "name": "Gaming" }],
            "price": 1299.0,
            "rating": 4.6,
            "stock": 3
        },
        {
            "id": "p2",
            "title": "Ultrabook Laptop 13",
            "brand": "Zenith",
            "categories": [{ "name": "Laptops" }],
            "price": 899.0,
            "rating": 4.2,
            "stock": 0
        },
        {
            "id": "p3",
            "title": "Laptop Sleeve",
            "brand": "Carry",
            "categories": [{ "name": "Accessories" }],
            "price": 24.5,
            "rating": 3.9,
            "stock": 40
        },
        {
            "id": "p4",
            "title": "iPhone 15 Pro",
            "brand": "Apple",
            "categories": [{ "name": "Phones" }],
            "price": 999.0,
            "rating": 4.8,
            "stock": 7
        },
        {
            "id": "p5",
            "title": "Galaxy S24",
            "brand": "Samsung",
            "categories": [{ "name": "Phones" }],
            "price": 849.0,
            "stock": 12
        },
        {
            "id": "p6",
            "title": "Wireless Keyboard",
            "brand": "Logitech",
            "categories": [{ "name": "Accessories" }],
            "price": 59.99,
            "rating": 4.4,
            "stock": 25
        },
        {
            "id": "p7",
            "title": "Graphic T-Shirt",
            "brand": "Threadly",
            "categories": [{ "name": "Apparel" }],
            "price": 19.0,
            "rating": 4.0,
            "stock": 100
        },
        {
            "id": "p8",
            "title": "Refurbished Laptop 14",
            "brand": "Acme",
            "categories": [{ "name": "Laptops" }],
            "price": 450.0,
            "stock": 2,
            "active": false
        }
    ])
}

/// Creates the sample storefront.
#[fixture]
pub fn storefront() -> Storefront {
    let catalog = TempCatalog::new(&sample_products());
    let state = catalog.state();
    Storefront { catalog, state }
}

/// Creates a storefront whose catalog is empty.
#[allow(dead_code)] // Used by search tests only
#[fixture]
pub fn empty_storefront() -> Storefront {
    let catalog = TempCatalog::new(&json!([]));
    let state = catalog.state();
    Storefront { catalog, state }
}
