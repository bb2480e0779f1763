//! Autocomplete handler.

use crate::state::SearchState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SuggestRequest {
    /// What the shopper has typed so far (at least 2 characters)
    pub query: String,
}

/// Suggest completions for a partially typed query.
pub fn handle_suggest(state: &SearchState, request: SuggestRequest) -> Result<String, String> {
    let response = state
        .suggest(&request.query)
        .map_err(|e| format!("Suggest failed: {:#}", anyhow::Error::from(e)))?;

    let mut output = String::new();
    if response.did_auto_correct {
        let _ = writeln!(
            output,
            "Corrected '{}' to '{}'",
            response.query, response.corrected_query
        );
    }

    if response.suggestions.is_empty() {
        let _ = writeln!(output, "No suggestions for '{}'.", response.corrected_query.trim());
        return Ok(output);
    }

    let _ = writeln!(output, "Suggestions for '{}':\n", response.corrected_query.trim());
    for suggestion in &response.suggestions {
        let _ = writeln!(output, "• {}", suggestion);
    }
    Ok(output)
}
