mod common;

use assert2::{check, let_assert};
use common::{Storefront, TempCatalog, sample_products, storefront};
use rstest::rstest;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use storefront_search::cache::DEFAULT_TTL;
use storefront_search::tools::correct::{CorrectRequest, handle_correct};
use storefront_search::tools::suggest::{SuggestRequest, handle_suggest};
use storefront_search::{Clock, Config, VocabularyCache};

/// Clock that only moves when told to.
struct ManualClock(Mutex<Instant>);

impl ManualClock {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Instant::now())))
    }

    fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.0.lock().unwrap()
    }
}

#[rstest]
#[case("lap", vec!["laptop", "laptops", "laptop sleeve", "gaming laptop 15", "ultrabook laptop 13"])]
#[case("LAP", vec!["laptop", "laptops", "laptop sleeve", "gaming laptop 15", "ultrabook laptop 13"])]
#[case("samsng", vec!["samsung"])] // corrected first
#[case("keybord", vec!["keyboard", "wireless keyboard"])]
#[case("iphome", vec!["iphone"])] // fuzzy only
#[case("refurb", vec![])] // inactive products contribute nothing
#[case("l", vec![])]
#[case("   ", vec![])]
fn suggest_ranks_vocabulary(
    storefront: Storefront,
    #[case] query: &str,
    #[case] expected: Vec<&str>,
) {
    let response = storefront.state.suggest(query).unwrap();
    check!(response.suggestions == expected);
}

#[rstest]
fn suggest_reports_correction(storefront: Storefront) {
    let response = storefront.state.suggest("wirless").unwrap();
    check!(response.did_auto_correct);
    check!(response.query == "wirless");
    check!(response.corrected_query == "wireless");
    check!(response.suggestions == vec!["wireless keyboard", "wireless"]);
}

#[test]
fn suggest_caps_results() {
    let catalog = TempCatalog::new(&sample_products());
    let config = Config::from_toml("[suggest]\nmax_results = 2").unwrap();
    let state = catalog.state_with(config);

    let response = state.suggest("lap").unwrap();
    check!(response.suggestions == vec!["laptop", "laptops"]);
}

/// Test: Vocabulary is reused until the TTL passes, then rebuilt from the catalog.
#[test]
fn suggest_refreshes_vocabulary_after_ttl() {
    let clock = ManualClock::new();
    let catalog = TempCatalog::new(&sample_products());
    let state = catalog
        .state()
        .with_cache(VocabularyCache::with_clock(DEFAULT_TTL, clock.clone()));

    check!(state.suggest("lap").unwrap().suggestions.len() == 5);

    catalog.write(&json!([
        { "id": "t1", "title": "Tablet Pro", "categories": [{ "name": "Tablets" }] }
    ]));

    clock.advance(DEFAULT_TTL - Duration::from_secs(1));
    check!(state.suggest("tab").unwrap().suggestions.is_empty());
    check!(state.suggest("lap").unwrap().suggestions.len() == 5);

    clock.advance(Duration::from_secs(1));
    check!(state.suggest("tab").unwrap().suggestions == vec!["tablet pro", "tablet", "tablets"]);
    check!(state.suggest("lap").unwrap().suggestions.is_empty());
}

/// Test: A broken catalog does not take autocomplete down while a vocabulary exists.
#[test]
fn suggest_serves_stale_vocabulary_on_failure() {
    let clock = ManualClock::new();
    let catalog = TempCatalog::new(&sample_products());
    let state = catalog
        .state()
        .with_cache(VocabularyCache::with_clock(DEFAULT_TTL, clock.clone()));

    state.suggest("lap").unwrap();
    std::fs::write(catalog.path(), "{ broken").unwrap();
    clock.advance(DEFAULT_TTL * 3);

    let response = state.suggest("lap").unwrap();
    check!(response.suggestions.first().map(String::as_str) == Some("laptop"));
}

#[test]
fn suggest_fails_without_any_vocabulary() {
    let catalog = TempCatalog::new(&sample_products());
    std::fs::remove_file(catalog.path()).unwrap();
    let state = catalog.state();

    let_assert!(Err(message) = handle_suggest(&state, SuggestRequest { query: "lap".into() }));
    check!(message.starts_with("Suggest failed: failed to read catalog at"));
}

#[rstest]
fn suggest_tool_output(storefront: Storefront) {
    let request = SuggestRequest {
        query: "hedphones".into(),
    };
    let_assert!(Ok(output) = handle_suggest(&storefront.state, request));
    check!(output == "Corrected 'hedphones' to 'headphones'\nNo suggestions for 'headphones'.\n");
}

#[rstest]
#[case("i want a labtob and a t shirt", "'i want a labtob and a t shirt' -> 'i want a laptop and a t shirt'")]
#[case("t shirt", "'t shirt' -> 't-shirt'")]
#[case("monitor", "'monitor' has no known corrections")]
fn correct_tool_output(storefront: Storefront, #[case] query: &str, #[case] expected: &str) {
    let result = handle_correct(&storefront.state, CorrectRequest { query: query.into() });
    check!(result.as_deref() == Ok(expected));
}
