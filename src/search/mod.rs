//! Fuzzy text search, typo correction and autocomplete for catalog queries.
//!
//! Everything here is a pure function of its inputs. Shared state (the cached
//! vocabulary) lives in [`crate::cache`].

// Module declarations
pub mod distance;
pub mod fuzzy;
pub mod query;
pub mod scoring;
pub mod terms;
pub mod typo;

// Public re-exports (used via lib.rs)
pub use distance::{distance, similarity};
pub use fuzzy::{DEFAULT_MATCH_THRESHOLD, match_score, matches};
pub use query::{SearchQuery, SortOrder};
pub use scoring::ScoringWeights;
pub use terms::{Vocabulary, extract_terms, suggest};
pub use typo::{TypoTable, correct};
