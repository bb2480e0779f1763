//! Catalog records and the read-only source they come from.
//!
//! The search engine never pages, filters or mutates the catalog itself. It
//! asks a [`CatalogSource`] for a capped snapshot and works on that.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A category a product is listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A product-like catalog record. Unknown JSON fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub price: f64,
    /// Average review rating, 0 to 5 stars.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl Product {
    /// Create an active product with only an id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            brand: None,
            description: None,
            categories: Vec::new(),
            price: 0.0,
            rating: None,
            stock: 0,
            active: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.categories.push(Category::new(name));
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Category names in listing order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Title, brand and category names: the fields a text query is matched against.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        self.title
            .as_deref()
            .into_iter()
            .chain(self.brand.as_deref())
            .chain(self.category_names())
    }

    /// Whether any category name equals `name`, ignoring case.
    pub fn in_category(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.category_names()
            .any(|category| category.to_lowercase() == name)
    }
}

/// Read access to a catalog snapshot.
///
/// Implementations return at most `limit` records, in catalog order.
pub trait CatalogSource: Send + Sync {
    fn load(&self, limit: usize) -> Result<Vec<Product>, CatalogError>;
}

impl CatalogSource for Vec<Product> {
    fn load(&self, limit: usize) -> Result<Vec<Product>, CatalogError> {
        Ok(self.iter().take(limit).cloned().collect())
    }
}

/// A catalog stored as a JSON array of [`Product`] records.
///
/// The file is re-read on every load so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonCatalog {
    fn load(&self, limit: usize) -> Result<Vec<Product>, CatalogError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Read {
            path: self.path.clone(),
            source,
        })?;

        let mut products: Vec<Product> =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: self.path.clone(),
                source,
            })?;
        products.truncate(limit);

        tracing::debug!(
            "Loaded {} products from {}",
            products.len(),
            self.path.display()
        );
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use std::io::Write as _;

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"id": "p1", "title": "iPhone 15 Pro", "categories": [{"name": "Phones"}], "sku": "ignored"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        check!(product.title.as_deref() == Some("iPhone 15 Pro"));
        check!(product.brand.is_none());
        check!(product.active);
        check!(product.stock == 0);
        check!(product.category_names().collect::<Vec<_>>() == vec!["Phones"]);
    }

    #[test]
    fn test_searchable_fields_order() {
        let product = Product::new("p1")
            .with_title("Gaming Laptop")
            .with_brand("Acme")
            .with_category("Computers")
            .with_category("Gaming");
        let fields: Vec<&str> = product.searchable_fields().collect();
        check!(fields == vec!["Gaming Laptop", "Acme", "Computers", "Gaming"]);
    }

    #[test]
    fn test_in_category_ignores_case() {
        let product = Product::new("p1").with_category("Phones");
        check!(product.in_category("phones"));
        check!(product.in_category("PHONES"));
        check!(!product.in_category("Tablets"));
    }

    #[test]
    fn test_vec_source_caps_records() {
        let source = vec![Product::new("a"), Product::new("b"), Product::new("c")];
        let loaded = source.load(2).unwrap();
        check!(loaded.len() == 2);
        check!(loaded[0].id == "a");
    }

    #[test]
    fn test_json_catalog_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "1", "title": "Laptop"}}, {{"id": "2", "title": "Tablet", "active": false}}]"#
        )
        .unwrap();

        let catalog = JsonCatalog::new(file.path());
        let products = catalog.load(10).unwrap();
        check!(products.len() == 2);
        check!(!products[1].active);
        check!(catalog.load(1).unwrap().len() == 1);
    }

    #[test]
    fn test_json_catalog_errors() {
        let missing = JsonCatalog::new("/nonexistent/catalog.json");
        let_assert!(Err(CatalogError::Read { .. }) = missing.load(10));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let_assert!(Err(CatalogError::Parse { path, .. }) = JsonCatalog::new(file.path()).load(10));
        check!(path == file.path());
    }
}
