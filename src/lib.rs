pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod facets;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use cache::{Clock, SystemClock, VocabularyCache};
pub use catalog::{CatalogSource, Category, JsonCatalog, Product};
pub use config::Config;
pub use error::{CatalogError, Result};
pub use facets::{Facets, PriceBucket};
pub use server::CatalogServer;
pub use state::{Correction, SearchHit, SearchResponse, SearchState, SuggestionResponse};
