//! Relevance scoring for autocomplete candidates and search results.
//!
//! The weights are empirically chosen. The only intended ordering is
//! prefix > substring > fuzzy; keep the defaults unless that ordering changes.

use super::distance::similarity;
use super::fuzzy::match_score;
use serde::Deserialize;

/// Weights and thresholds used to rank autocomplete candidates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringWeights {
    /// Score for a term starting with the query.
    pub prefix: f64,
    /// Score for a term containing the query elsewhere.
    pub substring: f64,
    /// Minimum whole-string similarity for a fuzzy candidate.
    pub fuzzy_threshold: f64,
    /// Multiplier applied to a fuzzy candidate's similarity.
    pub fuzzy_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            prefix: 1.0,
            substring: 0.8,
            fuzzy_threshold: 0.7,
            fuzzy_weight: 0.6,
        }
    }
}

impl ScoringWeights {
    /// Score a vocabulary term against a case-folded query.
    ///
    /// - `prefix`: term starts with query
    /// - `substring`: term contains query
    /// - `similarity * fuzzy_weight`: similarity reaches `fuzzy_threshold`
    /// - None: no match
    pub fn suggestion_score(&self, term: &str, query: &str) -> Option<f64> {
        if term.starts_with(query) {
            Some(self.prefix)
        } else if term.contains(query) {
            Some(self.substring)
        } else {
            let sim = similarity(query, term);
            (sim >= self.fuzzy_threshold).then(|| sim * self.fuzzy_weight)
        }
    }
}

/// Best [`match_score`] of `query` across a set of product fields.
///
/// Returns 0.0 when there are no fields to compare against.
pub fn field_relevance<'a>(query: &str, fields: impl IntoIterator<Item = &'a str>) -> f64 {
    fields
        .into_iter()
        .map(|field| match_score(query, field))
        .fold(0.0, f64::max)
}
