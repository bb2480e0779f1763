use rmcp::{ServiceExt, transport::stdio};
use storefront_search::{CatalogServer, Config, SearchState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr to avoid interfering with MCP protocol on stdout
    storefront_search::tracing::init();

    tracing::info!("Starting storefront-search MCP server");

    let config = Config::discover(std::env::args().nth(1))?;
    let state = SearchState::from_config(config)?;

    // Warm the vocabulary cache so the first keystroke is fast
    if let Err(e) = state.vocabulary() {
        tracing::warn!("Initial vocabulary build failed: {:#}", anyhow::Error::from(e));
    }

    let server = CatalogServer::new(state);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
