//! Runtime configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working setup with the stock thresholds and weights.

use crate::error::Result;
use crate::search::{DEFAULT_MATCH_THRESHOLD, ScoringWeights, TypoTable};
use crate::search::query::DEFAULT_PER_PAGE;
use anyhow::{Context, ensure};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "STOREFRONT_SEARCH_CONFIG";

/// Environment variable overriding `catalog.path`.
pub const CATALOG_ENV: &str = "STOREFRONT_CATALOG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub suggest: SuggestConfig,
    pub scoring: ScoringWeights,
    /// Extra misspelling -> correction pairs on top of the built-in table.
    pub typos: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// JSON catalog file. `~` is expanded.
    pub path: Option<String>,
    /// Cap on records read per snapshot.
    pub max_records: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_records: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Fuzzy match threshold for product fields.
    pub match_threshold: f64,
    pub default_per_page: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuggestConfig {
    pub max_results: usize,
    /// Vocabulary cache validity window in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_results: 8,
            cache_ttl_secs: crate::cache::DEFAULT_TTL.as_secs(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config at {}", path.display()))
    }

    /// Locate and load the config for this process.
    ///
    /// Looks at, in order: the explicit path (first CLI argument),
    /// `$STOREFRONT_SEARCH_CONFIG`, then `<config dir>/storefront-search/config.toml`
    /// if it exists. Falls back to defaults. `$STOREFRONT_CATALOG` overrides the
    /// catalog path afterwards.
    pub fn discover(explicit: Option<String>) -> Result<Self> {
        let path = explicit
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .map(|p| PathBuf::from(&*expand_tilde(&p)))
            .or_else(|| {
                dirs::config_dir()
                    .map(|dir| dir.join("storefront-search").join("config.toml"))
                    .filter(|path| path.exists())
            });

        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading config from {}", path.display());
                Self::load(&path)?
            }
            None => {
                tracing::info!("No config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(catalog) = std::env::var(CATALOG_ENV) {
            config.catalog.path = Some(catalog);
        }

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        ensure!(
            unit.contains(&self.search.match_threshold),
            "search.match_threshold must be within 0..=1, got {}",
            self.search.match_threshold
        );
        ensure!(
            unit.contains(&self.scoring.fuzzy_threshold),
            "scoring.fuzzy_threshold must be within 0..=1, got {}",
            self.scoring.fuzzy_threshold
        );
        ensure!(
            self.scoring.prefix >= self.scoring.substring
                && self.scoring.substring >= self.scoring.fuzzy_weight,
            "scoring weights must keep prefix >= substring >= fuzzy_weight"
        );
        ensure!(self.catalog.max_records > 0, "catalog.max_records must be positive");
        Ok(())
    }

    /// Catalog file path with `~` expanded, if one is configured.
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog
            .path
            .as_deref()
            .map(|p| PathBuf::from(&*expand_tilde(p)))
    }

    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.suggest.cache_ttl_secs)
    }

    /// Built-in typo table extended with the configured pairs.
    pub fn typo_table(&self) -> TypoTable {
        TypoTable::with_entries(self.typos.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
///
/// Returns `Cow::Borrowed` if no expansion needed, `Cow::Owned` if expanded.
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
