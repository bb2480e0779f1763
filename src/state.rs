//! Shared search state and the two request-level operations built on it.
//!
//! [`SearchState`] owns the catalog source, the typo table, the vocabulary
//! cache and the configuration. It is the central coordination point for:
//! - query correction
//! - autocomplete suggestions (served from the cached vocabulary)
//! - full search with filters, ranking, paging and facets

use crate::cache::VocabularyCache;
use crate::catalog::{CatalogSource, JsonCatalog, Product};
use crate::config::Config;
use crate::error::{self, CatalogError};
use crate::facets::Facets;
use crate::search::scoring::field_relevance;
use crate::search::{SearchQuery, SortOrder, TypoTable, Vocabulary, extract_terms, matches, suggest};
use rapidfuzz::distance::jaro_winkler;
use serde::Serialize;
use std::sync::Arc;

/// Jaro-Winkler similarity a category name needs to be offered as "did you mean".
const CATEGORY_SUGGESTION_THRESHOLD: f64 = 0.8;
const MAX_CATEGORY_SUGGESTIONS: usize = 5;

/// Outcome of running a query through the typo table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    pub original: String,
    pub corrected: String,
    pub did_auto_correct: bool,
}

/// Autocomplete answer for one keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionResponse {
    pub query: String,
    pub corrected_query: String,
    pub did_auto_correct: bool,
    pub suggestions: Vec<String>,
}

/// A product that matched, with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub product: Product,
    /// Best match score across title, brand and categories (1.0 with no text).
    pub score: f64,
}

/// Full search answer: one page of ranked hits plus facets for the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub corrected_query: String,
    pub did_auto_correct: bool,
    pub suggestions: Vec<String>,
    pub hits: Vec<SearchHit>,
    /// Number of matching products before paging.
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub facets: Facets,
    /// Close category names, set when the category filter names no catalog category.
    pub category_suggestions: Option<Vec<String>>,
}

impl SearchResponse {
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page.max(1))
    }
}

pub struct SearchState {
    catalog: Arc<dyn CatalogSource>,
    typos: TypoTable,
    cache: VocabularyCache,
    config: Config,
}

impl std::fmt::Debug for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchState")
            .field("typos", &self.typos.len())
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SearchState {
    /// Create state over `catalog`, with the cache TTL and typo table taken from `config`.
    pub fn new(catalog: Arc<dyn CatalogSource>, config: Config) -> Self {
        Self {
            catalog,
            typos: config.typo_table(),
            cache: VocabularyCache::new(config.cache_ttl()),
            config,
        }
    }

    /// Create state reading the JSON catalog named in `config`.
    pub fn from_config(config: Config) -> error::Result<Self> {
        let path = config.catalog_path().ok_or_else(|| {
            anyhow::anyhow!(
                "No catalog configured. Set catalog.path in the config file or ${}",
                crate::config::CATALOG_ENV
            )
        })?;
        let catalog = JsonCatalog::new(path);
        tracing::info!("Using catalog at {}", catalog.path().display());
        Ok(Self::new(Arc::new(catalog), config))
    }

    /// Replace the vocabulary cache (e.g. one driven by a test clock).
    #[must_use]
    pub fn with_cache(mut self, cache: VocabularyCache) -> Self {
        self.cache = cache;
        self
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn cache(&self) -> &VocabularyCache {
        &self.cache
    }

    /// Run `input` through the typo table.
    pub fn correct(&self, input: &str) -> Correction {
        let corrected = self.typos.correct(input);
        Correction {
            did_auto_correct: corrected != input,
            original: input.to_string(),
            corrected,
        }
    }

    /// Read a capped snapshot of the catalog.
    pub fn snapshot(&self) -> Result<Vec<Product>, CatalogError> {
        self.catalog.load(self.config.catalog.max_records)
    }

    /// Active products' vocabulary, from the cache when it is fresh.
    pub fn vocabulary(&self) -> Result<Arc<Vocabulary>, CatalogError> {
        self.cache.get_or_refresh(|| {
            let products = self.snapshot()?;
            Ok(extract_terms(products.iter().filter(|p| p.active)))
        })
    }

    /// Autocomplete suggestions for a partially typed query.
    pub fn suggest(&self, query: &str) -> Result<SuggestionResponse, CatalogError> {
        let correction = self.correct(query);
        let vocabulary = self.vocabulary()?;
        let suggestions = suggest(
            &correction.corrected,
            &vocabulary,
            self.config.suggest.max_results,
            &self.config.scoring,
        );

        tracing::debug!(
            "Suggest '{}' -> {} suggestions (corrected: {})",
            query,
            suggestions.len(),
            correction.did_auto_correct
        );

        Ok(SuggestionResponse {
            query: correction.original,
            corrected_query: correction.corrected,
            did_auto_correct: correction.did_auto_correct,
            suggestions,
        })
    }

    /// Full search: correct the text, match active products, filter, rank,
    /// compute facets, then cut out the requested page.
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResponse, CatalogError> {
        let start = std::time::Instant::now();
        let correction = self.correct(&query.text);
        let text = correction.corrected.trim();
        let threshold = self.config.search.match_threshold;

        let products = self.snapshot()?;
        let category_suggestions = query
            .category
            .as_deref()
            .and_then(|category| close_categories(&products, category));
        let vocabulary = self.cache.get_or_refresh(|| {
            Ok::<_, CatalogError>(extract_terms(products.iter().filter(|p| p.active)))
        })?;

        let mut hits: Vec<SearchHit> = products
            .into_iter()
            .filter(|product| product.active && query.accepts(product))
            .filter_map(|product| {
                if text.is_empty() {
                    return Some(SearchHit { product, score: 1.0 });
                }
                if !product
                    .searchable_fields()
                    .any(|field| matches(text, field, threshold))
                {
                    return None;
                }
                let score = field_relevance(text, product.searchable_fields());
                Some(SearchHit { product, score })
            })
            .collect();

        sort_hits(&mut hits, query.sort);

        let facets = Facets::compute(hits.iter().map(|hit| &hit.product));
        let total = hits.len();
        let (page, per_page) = (query.page(), query.per_page());
        let hits: Vec<SearchHit> = hits
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        let suggestions = suggest(
            text,
            &vocabulary,
            self.config.suggest.max_results,
            &self.config.scoring,
        );

        tracing::info!(
            "Search '{}' (as '{}'): {} matches, page {} of {} in {:?}",
            query.text,
            text,
            total,
            page,
            total.div_ceil(per_page),
            start.elapsed()
        );

        Ok(SearchResponse {
            query: correction.original,
            corrected_query: correction.corrected,
            did_auto_correct: correction.did_auto_correct,
            suggestions,
            hits,
            total,
            page,
            per_page,
            facets,
            category_suggestions,
        })
    }
}

/// `None` when an active product is listed under `category`, otherwise the
/// closest known category names, best first.
fn close_categories(products: &[Product], category: &str) -> Option<Vec<String>> {
    let wanted = category.to_lowercase();
    let mut names: Vec<&str> = products
        .iter()
        .filter(|p| p.active)
        .flat_map(|p| p.category_names())
        .collect();
    names.sort_unstable();
    names.dedup();

    if names.iter().any(|name| name.to_lowercase() == wanted) {
        return None;
    }

    let mut scored: Vec<(&str, f64)> = names
        .into_iter()
        .map(|name| {
            let score = jaro_winkler::similarity(wanted.chars(), name.to_lowercase().chars());
            (name, score)
        })
        .filter(|(_, score)| *score > CATEGORY_SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    Some(
        scored
            .into_iter()
            .take(MAX_CATEGORY_SUGGESTIONS)
            .map(|(name, _)| name.to_string())
            .collect(),
    )
}

/// Stable sort, so equal keys keep catalog order.
fn sort_hits(hits: &mut [SearchHit], sort: SortOrder) {
    match sort {
        SortOrder::Relevance => hits.sort_by(|a, b| b.score.total_cmp(&a.score)),
        SortOrder::PriceAsc => hits.sort_by(|a, b| a.product.price.total_cmp(&b.product.price)),
        SortOrder::PriceDesc => hits.sort_by(|a, b| b.product.price.total_cmp(&a.product.price)),
        SortOrder::Rating => hits.sort_by(|a, b| {
            let rating = |hit: &SearchHit| hit.product.rating.unwrap_or(f64::NEG_INFINITY);
            rating(b).total_cmp(&rating(a))
        }),
    }
}
