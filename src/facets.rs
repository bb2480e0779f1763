//! Facet counts over a filtered result set.
//!
//! Plain aggregation: nothing here looks at the query text.

use crate::catalog::Product;
use serde::Serialize;
use std::collections::BTreeMap;

/// Lower bounds of the price buckets. Each bucket runs up to the next bound.
const PRICE_BOUNDS: &[f64] = &[0.0, 50.0, 100.0, 250.0, 500.0, 1000.0];

/// A price bucket and the number of results in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBucket {
    pub label: String,
    pub min: f64,
    /// Exclusive upper bound; `None` for the open-ended top bucket.
    pub max: Option<f64>,
    pub count: usize,
}

/// Aggregated counts shown next to search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facets {
    /// Category name -> count, most common first (ties by name).
    pub categories: Vec<(String, usize)>,
    /// Brand -> count, most common first (ties by name).
    pub brands: Vec<(String, usize)>,
    /// Every price bucket, including empty ones.
    pub price_ranges: Vec<PriceBucket>,
    /// Whole stars (0 to 5) -> count of rated products.
    pub ratings: BTreeMap<u8, usize>,
}

impl Facets {
    /// Compute facets over `products`.
    pub fn compute<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
        let mut brands: BTreeMap<&str, usize> = BTreeMap::new();
        let mut price_counts = vec![0usize; PRICE_BOUNDS.len()];
        let mut ratings = BTreeMap::new();

        for product in products {
            for name in product.category_names() {
                *categories.entry(name).or_insert(0) += 1;
            }
            if let Some(brand) = product.brand.as_deref() {
                *brands.entry(brand).or_insert(0) += 1;
            }
            price_counts[price_bucket(product.price)] += 1;
            if let Some(rating) = product.rating {
                *ratings.entry(star_bucket(rating)).or_insert(0) += 1;
            }
        }

        Self {
            categories: ranked(categories),
            brands: ranked(brands),
            price_ranges: PRICE_BOUNDS
                .iter()
                .zip(price_counts)
                .enumerate()
                .map(|(i, (&min, count))| {
                    let max = PRICE_BOUNDS.get(i + 1).copied();
                    PriceBucket {
                        label: max.map_or_else(
                            || format!("{}+", min),
                            |max| format!("{}-{}", min, max),
                        ),
                        min,
                        max,
                        count,
                    }
                })
                .collect(),
            ratings,
        }
    }
}

/// Index of the price bucket for `price`. Negative or NaN prices land in the first.
fn price_bucket(price: f64) -> usize {
    PRICE_BOUNDS
        .iter()
        .rposition(|&bound| price >= bound)
        .unwrap_or(0)
}

/// Whole-star bucket for a rating, clamped to 0..=5.
fn star_bucket(rating: f64) -> u8 {
    // clamped first, so the cast cannot truncate
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let stars = rating.clamp(0.0, 5.0).floor() as u8;
    stars
}

/// Counts sorted by count descending, then name ascending.
fn ranked(counts: BTreeMap<&str, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    // stable: BTreeMap order already sorts names
    ranked.sort_by(|(_, a), (_, b)| b.cmp(a));
    ranked
}
