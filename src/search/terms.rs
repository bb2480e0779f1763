//! Vocabulary extraction from a catalog snapshot and autocomplete ranking.

use super::scoring::ScoringWeights;
use crate::catalog::Product;
use ahash::AHashSet;

/// Title tokens must be longer than this to enter the vocabulary.
const MIN_TOKEN_CHARS: usize = 2;

/// Queries shorter than this never produce suggestions.
pub const MIN_QUERY_CHARS: usize = 2;

/// A deduplicated, case-folded set of terms that keeps first-seen order.
///
/// Iteration order matters: ties in [`suggest`] keep vocabulary order.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    seen: AHashSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-fold and insert `term`. Blank terms and duplicates are ignored.
    /// Returns whether the term was new.
    pub fn insert(&mut self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() || self.seen.contains(&term) {
            return false;
        }
        self.seen.insert(term.clone());
        self.terms.push(term);
        true
    }

    pub fn contains(&self, term: &str) -> bool {
        self.seen.contains(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut vocabulary = Self::new();
        for term in iter {
            vocabulary.insert(term.as_ref());
        }
        vocabulary
    }
}

/// Build the autocomplete vocabulary from a catalog snapshot.
///
/// Collects, per product: the full title, each title token longer than two
/// characters, the brand, and every category name.
pub fn extract_terms<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vocabulary {
    let start = std::time::Instant::now();
    let mut vocabulary = Vocabulary::new();
    let mut product_count = 0usize;

    for product in products {
        product_count += 1;

        if let Some(title) = &product.title {
            vocabulary.insert(title);
            for token in title.split_whitespace() {
                if token.chars().count() > MIN_TOKEN_CHARS {
                    vocabulary.insert(token);
                }
            }
        }

        if let Some(brand) = &product.brand {
            vocabulary.insert(brand);
        }

        for category in product.category_names() {
            vocabulary.insert(category);
        }
    }

    tracing::info!(
        "Built vocabulary: {} terms from {} products in {:?}",
        vocabulary.len(),
        product_count,
        start.elapsed()
    );

    vocabulary
}

/// Rank vocabulary terms as completions for `query`.
///
/// Prefix matches beat substring matches, which beat fuzzy matches. The sort
/// is stable, so equal scores keep vocabulary order. At most `max_results`
/// terms are returned.
pub fn suggest(
    query: &str,
    vocabulary: &Vocabulary,
    max_results: usize,
    weights: &ScoringWeights,
) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_QUERY_CHARS {
        return vec![];
    }

    let mut scored: Vec<(&str, f64)> = vocabulary
        .iter()
        .filter_map(|term| {
            weights
                .suggestion_score(term, &query)
                .map(|score| (term, score))
        })
        .collect();

    scored.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    scored
        .into_iter()
        .take(max_results)
        .map(|(term, _)| term.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn iphone() -> Product {
        Product::new("p1")
            .with_title("iPhone 15 Pro")
            .with_brand("Apple")
            .with_category("Phones")
    }

    #[test]
    fn test_extract_terms() {
        let products = [iphone()];
        let vocabulary = extract_terms(&products);

        for expected in ["iphone 15 pro", "iphone", "pro", "apple", "phones"] {
            check!(vocabulary.contains(expected), "missing {}", expected);
        }
        // two-character tokens are skipped
        check!(!vocabulary.contains("15"));
        check!(vocabulary.len() == 5);
    }

    #[test]
    fn test_extract_terms_deduplicates_across_products() {
        let products = [
            iphone(),
            Product::new("p2")
                .with_title("iPhone 14")
                .with_brand("APPLE")
                .with_category("phones"),
        ];
        let vocabulary = extract_terms(&products);
        let terms: Vec<&str> = vocabulary.iter().collect();
        check!(terms == vec!["iphone 15 pro", "iphone", "pro", "apple", "phones", "iphone 14"]);
    }

    #[test]
    fn test_extract_terms_handles_missing_fields() {
        let products = [Product::new("bare"), Product::new("blank").with_brand("  ")];
        check!(extract_terms(&products).is_empty());
    }

    #[test]
    fn test_suggest_prefix_beats_everything() {
        let vocabulary: Vocabulary = ["laptop", "laptop bag", "tablet"].into_iter().collect();
        let suggestions = suggest("lap", &vocabulary, 5, &ScoringWeights::default());
        check!(suggestions == vec!["laptop", "laptop bag"]);
    }

    #[test]
    fn test_suggest_orders_prefix_substring_fuzzy() {
        let vocabulary: Vocabulary = ["headphone", "wireless headphones", "headphones"]
            .into_iter()
            .collect();
        let ranked = suggest("phone", &vocabulary, 5, &ScoringWeights::default());
        // all substring hits, vocabulary order kept
        check!(ranked == vec!["headphone", "wireless headphones", "headphones"]);

        let ranked = suggest("head", &vocabulary, 5, &ScoringWeights::default());
        check!(ranked == vec!["headphone", "headphones", "wireless headphones"]);
    }

    #[test]
    fn test_suggest_fuzzy_only_when_close() {
        let vocabulary: Vocabulary = ["headset", "wireless headphones", "headphones"]
            .into_iter()
            .collect();
        let suggestions = suggest("headphonez", &vocabulary, 5, &ScoringWeights::default());
        check!(suggestions == vec!["headphones"]);
    }

    #[rstest]
    #[case("")]
    #[case("l")]
    #[case(" l ")]
    fn test_suggest_short_query_is_empty(#[case] query: &str) {
        let vocabulary: Vocabulary = ["laptop", "lamp"].into_iter().collect();
        check!(suggest(query, &vocabulary, 5, &ScoringWeights::default()).is_empty());
    }

    #[test]
    fn test_suggest_truncates_and_folds_case() {
        let vocabulary: Vocabulary = ["lamp", "laptop", "lantern", "label"].into_iter().collect();
        let suggestions = suggest("LA", &vocabulary, 2, &ScoringWeights::default());
        check!(suggestions == vec!["lamp", "laptop"]);
    }

    #[test]
    fn test_vocabulary_insert_reports_new_terms() {
        let mut vocabulary = Vocabulary::new();
        check!(vocabulary.insert("Laptop"));
        check!(!vocabulary.insert(" laptop "));
        check!(!vocabulary.insert(""));
        check!(vocabulary.len() == 1);
    }
}
