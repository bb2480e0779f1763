//! MCP server exposing catalog search, autocomplete and typo correction.

use crate::state::SearchState;
use crate::tools::correct::{CorrectRequest, handle_correct};
use crate::tools::search::{SearchRequest, handle_search};
use crate::tools::suggest::{SuggestRequest, handle_suggest};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for storefront catalog queries
#[derive(Clone)]
pub struct CatalogServer {
    /// Shared search state (catalog, typo table, vocabulary cache)
    state: Arc<SearchState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for CatalogServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl CatalogServer {
    pub fn new(state: SearchState) -> Self {
        Self {
            state: Arc::new(state),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Search the product catalog. Misspelled queries are corrected automatically and matched fuzzily against titles, brands and categories. Supports category, brand, price, rating and stock filters, sorting and paging, and returns facet counts for refining the search.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || handle_search(&state, request))
            .await
            .map_err(|e| format!("Search task failed: {}", e))?
    }

    #[tool(
        description = "Autocomplete a partially typed query. Returns up to a handful of catalog terms (titles, brands, categories), best completions first.",
        input_schema = inline_schema_for_type::<SuggestRequest>()
    )]
    async fn suggest(
        &self,
        Parameters(request): Parameters<SuggestRequest>,
    ) -> std::result::Result<String, String> {
        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || handle_suggest(&state, request))
            .await
            .map_err(|e| format!("Suggest task failed: {}", e))?
    }

    #[tool(
        description = "Check a query for common misspellings (e.g. 'labtob' -> 'laptop') without searching.",
        input_schema = inline_schema_for_type::<CorrectRequest>()
    )]
    async fn correct_query(
        &self,
        Parameters(request): Parameters<CorrectRequest>,
    ) -> std::result::Result<String, String> {
        handle_correct(&self.state, request)
    }
}

#[tool_handler]
impl ServerHandler for CatalogServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "storefront-search: fuzzy product search over a storefront catalog. \
                 Use search for filtered, faceted results, suggest for autocomplete while typing, \
                 and correct_query to preview typo correction.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// to generate inline enum definitions instead of $ref patterns. This ensures MCP Inspector
/// displays enums as dropdown widgets rather than raw JSON input fields.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();

    let json_object = match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(object)) => object,
        Ok(_) | Err(_) => {
            tracing::error!("Schema for {} did not serialize to an object", std::any::type_name::<T>());
            JsonObject::new()
        }
    };

    Arc::new(json_object)
}
