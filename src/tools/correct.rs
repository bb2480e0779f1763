//! Typo correction handler.

use crate::state::SearchState;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CorrectRequest {
    /// Query text to check for known misspellings
    pub query: String,
}

/// Run a query through the typo table without searching.
pub fn handle_correct(state: &SearchState, request: CorrectRequest) -> Result<String, String> {
    let correction = state.correct(&request.query);
    if correction.did_auto_correct {
        Ok(format!(
            "'{}' -> '{}'",
            correction.original, correction.corrected
        ))
    } else {
        Ok(format!("'{}' has no known corrections", correction.original))
    }
}
