//! Approximate matching of a query against a target string and its tokens.
//!
//! Substring containment is checked first since it is cheap and precise for
//! well-typed queries. Similarity is then compared per whitespace token so a
//! typo in one word is not drowned out by the length of a multi-word title.

use super::distance::similarity;

/// Similarity a query must reach against a token or target to count as a match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.7;

/// Decide whether `query` approximately matches `target`.
///
/// Checked in order, first hit wins:
/// 1. `target` contains `query` (case-folded)
/// 2. a whitespace token of `target` contains `query`
/// 3. a token has `similarity(query, token) >= threshold`
/// 4. the whole target has `similarity(query, target) >= threshold`
pub fn matches(query: &str, target: &str, threshold: f64) -> bool {
    let query = query.to_lowercase();
    let target = target.to_lowercase();

    if target.contains(&query) {
        return true;
    }

    if target.split_whitespace().any(|token| token.contains(&query)) {
        return true;
    }

    if target
        .split_whitespace()
        .any(|token| similarity(&query, token) >= threshold)
    {
        return true;
    }

    similarity(&query, &target) >= threshold
}

/// Graded version of [`matches`] used to rank results.
///
/// Returns 1.0 when the target (or one of its tokens) contains the query,
/// otherwise the best of the per-token and whole-string similarities.
/// `matches(q, t, th)` holds exactly when `match_score(q, t) >= th`.
pub fn match_score(query: &str, target: &str) -> f64 {
    let query = query.to_lowercase();
    let target = target.to_lowercase();

    if target.contains(&query) {
        return 1.0;
    }

    target
        .split_whitespace()
        .map(|token| similarity(&query, token))
        .fold(similarity(&query, &target), f64::max)
}
