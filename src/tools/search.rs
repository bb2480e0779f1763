//! Catalog search handler: typo correction, fuzzy matching, filters and facets.

use crate::search::{SearchQuery, SortOrder};
use crate::state::{SearchResponse, SearchState};
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

/// Result ordering accepted by the search tool.
#[derive(Debug, Clone, Copy, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortParam {
    /// Best text match first
    #[default]
    Relevance,
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
    /// Highest rated first
    Rating,
}

impl From<SortParam> for SortOrder {
    fn from(sort: SortParam) -> Self {
        match sort {
            SortParam::Relevance => Self::Relevance,
            SortParam::PriceAsc => Self::PriceAsc,
            SortParam::PriceDesc => Self::PriceDesc,
            SortParam::Rating => Self::Rating,
        }
    }
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Search text. Known misspellings are corrected automatically. Empty lists everything.
    #[serde(default)]
    pub query: String,
    /// Only products listed in this category
    pub category: Option<String>,
    /// Only products of this brand
    pub brand: Option<String>,
    /// Minimum price (inclusive)
    pub min_price: Option<f64>,
    /// Maximum price (inclusive)
    pub max_price: Option<f64>,
    /// Minimum average rating, 0 to 5
    pub min_rating: Option<f64>,
    /// Hide products that are out of stock
    #[serde(default)]
    pub in_stock_only: bool,
    /// Result ordering (default: relevance)
    #[serde(default)]
    pub sort: SortParam,
    /// Page number, starting at 1 (default: 1)
    pub page: Option<usize>,
    /// Results per page (default from config, at most 100)
    pub per_page: Option<usize>,
}

impl SearchRequest {
    /// Convert into a [`SearchQuery`], filling paging defaults from `state`'s config.
    pub fn into_query(self, state: &SearchState) -> SearchQuery {
        SearchQuery {
            text: self.query,
            category: self.category,
            brand: self.brand,
            min_price: self.min_price,
            max_price: self.max_price,
            min_rating: self.min_rating,
            in_stock_only: self.in_stock_only,
            sort: self.sort.into(),
            page: self.page.unwrap_or(1),
            per_page: self
                .per_page
                .unwrap_or(state.config().search.default_per_page),
        }
    }
}

/// Execute a catalog search and format the response.
pub fn handle_search(state: &SearchState, request: SearchRequest) -> Result<String, String> {
    let query = request.into_query(state);

    let response = state
        .search(&query)
        .map_err(|e| format!("Search failed: {:#}", anyhow::Error::from(e)))?;

    // An unknown category filter can never match; offer close names instead
    if let (Some(category), Some(close)) = (&query.category, &response.category_suggestions) {
        return Ok(format_unknown_category(category, close));
    }

    if response.total == 0 {
        return Ok(format_no_results(&response));
    }

    if response.hits.is_empty() {
        return Ok(format_past_end(&response));
    }

    Ok(format_search_results(&response))
}

fn format_unknown_category(category: &str, close: &[String]) -> String {
    let mut result = format!("Category '{}' not found.", category);
    if close.is_empty() {
        result.push('\n');
    } else {
        result.push_str(" Did you mean one of these?\n\n");
        for name in close {
            let _ = writeln!(result, "• `{}`", name);
        }
    }
    result
}

fn correction_notice(response: &SearchResponse) -> Option<String> {
    response.did_auto_correct.then(|| {
        format!(
            "Showing results for '{}' (searched for '{}')\n",
            response.corrected_query, response.query
        )
    })
}

fn format_past_end(response: &SearchResponse) -> String {
    let mut msg = correction_notice(response).unwrap_or_default();
    let _ = writeln!(
        msg,
        "Page {} of {} is past the end ({} found). Request a page between 1 and {}.",
        response.page,
        response.total_pages(),
        response.total,
        response.total_pages()
    );
    msg
}

fn format_no_results(response: &SearchResponse) -> String {
    let mut msg = correction_notice(response).unwrap_or_default();
    let _ = writeln!(msg, "No results found for '{}'.\n", response.query);

    if !response.suggestions.is_empty() {
        let _ = writeln!(msg, "Related searches: {}\n", response.suggestions.join(", "));
    }

    msg.push_str("Search tips:\n");
    msg.push_str("• Try a shorter or more general term\n");
    msg.push_str("• Search by brand or category name, e.g. 'Apple' or 'Laptops'\n");
    msg.push_str("• Remove price, rating or stock filters\n");
    msg
}

/// Format search results into a readable string output.
fn format_search_results(response: &SearchResponse) -> String {
    let mut output = correction_notice(response).unwrap_or_default();

    let shown = if response.corrected_query.trim().is_empty() {
        "all products".to_string()
    } else {
        format!("'{}'", response.corrected_query.trim())
    };
    let _ = writeln!(
        output,
        "Search results for {} ({} found, page {} of {}):\n",
        shown,
        response.total,
        response.page,
        response.total_pages()
    );

    let offset = (response.page - 1) * response.per_page;
    for (idx, hit) in response.hits.iter().enumerate() {
        let product = &hit.product;
        let relevance = (hit.score * 100.0).round();
        let _ = write!(
            output,
            "{}. `{}`",
            offset + idx + 1,
            product.title.as_deref().unwrap_or(&product.id)
        );
        if let Some(brand) = &product.brand {
            let _ = write!(output, " by {}", brand);
        }
        let _ = writeln!(output, " - ${:.2} - relevance: {}%", product.price, relevance);

        let categories: Vec<&str> = product.category_names().collect();
        if !categories.is_empty() {
            let _ = writeln!(output, "   Categories: {}", categories.join(", "));
        }
        match product.rating {
            Some(rating) => {
                let _ = writeln!(output, "   Rating: {:.1}/5, {} in stock", rating, product.stock);
            }
            None => {
                let _ = writeln!(output, "   {} in stock", product.stock);
            }
        }
        output.push('\n');
    }

    format_facets(&mut output, response);

    if !response.suggestions.is_empty() {
        let _ = writeln!(output, "\nRelated searches: {}", response.suggestions.join(", "));
    }

    output
}

fn format_facets(output: &mut String, response: &SearchResponse) {
    let facets = &response.facets;
    output.push_str("Refine by:\n");

    let list = |items: &[(String, usize)]| {
        items
            .iter()
            .map(|(name, count)| format!("{} ({})", name, count))
            .collect::<Vec<_>>()
            .join(", ")
    };

    if !facets.categories.is_empty() {
        let _ = writeln!(output, "• Category: {}", list(&facets.categories));
    }
    if !facets.brands.is_empty() {
        let _ = writeln!(output, "• Brand: {}", list(&facets.brands));
    }

    let prices: Vec<String> = facets
        .price_ranges
        .iter()
        .filter(|bucket| bucket.count > 0)
        .map(|bucket| format!("${} ({})", bucket.label, bucket.count))
        .collect();
    if !prices.is_empty() {
        let _ = writeln!(output, "• Price: {}", prices.join(", "));
    }

    if !facets.ratings.is_empty() {
        let ratings: Vec<String> = facets
            .ratings
            .iter()
            .rev()
            .map(|(stars, count)| format!("{}★ ({})", stars, count))
            .collect();
        let _ = writeln!(output, "• Rating: {}", ratings.join(", "));
    }
}
