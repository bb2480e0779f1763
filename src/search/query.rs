//! Search request parameters: text, filters, ordering and paging.

use crate::catalog::Product;

/// Page size used when a request does not ask for one.
pub const DEFAULT_PER_PAGE: usize = 20;

/// Upper bound on the page size a request may ask for.
pub const MAX_PER_PAGE: usize = 100;

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Best text match first; catalog order when there is no text.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    /// Highest rated first, unrated last.
    Rating,
}

/// A full search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub in_stock_only: bool,
    pub sort: SortOrder,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: None,
            brand: None,
            min_price: None,
            max_price: None,
            min_rating: None,
            in_stock_only: false,
            sort: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Page number clamped to at least 1.
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Page size clamped to `1..=MAX_PER_PAGE`.
    pub fn per_page(&self) -> usize {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    /// Whether `product` passes every structured filter (text is matched separately).
    pub fn accepts(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && !product.in_category(category)
        {
            return false;
        }

        if let Some(brand) = &self.brand
            && !product
                .brand
                .as_deref()
                .is_some_and(|b| b.to_lowercase() == brand.to_lowercase())
        {
            return false;
        }

        if self.min_price.is_some_and(|min| product.price < min)
            || self.max_price.is_some_and(|max| product.price > max)
        {
            return false;
        }

        if let Some(min_rating) = self.min_rating
            && !product.rating.is_some_and(|rating| rating >= min_rating)
        {
            return false;
        }

        !self.in_stock_only || product.stock > 0
    }
}
