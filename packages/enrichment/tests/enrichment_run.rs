//! End-to-end runs over an in-memory sheet.
//!
//! These wire the real registry scraper (over a mock renderer) and the real
//! runner together, so the only doubles are at the network edges.

use std::sync::Arc;
use std::time::Duration;

use enrichment::registry::{director_selector, revenue_selector};
use enrichment::testing::{MockRenderer, MockSearcher, MockSheetStore};
use enrichment::{
    BatchRunner, CellUpdate, ColumnMap, EnrichmentError, RegistryScraper, RunConfig,
    SearchFailurePolicy, SheetSnapshot, LINK_NOT_FOUND, REGISTRY_NOT_FOUND,
};

/// Sheet layout with an unrelated column in the middle, as in the live sheet.
fn headers() -> Vec<String> {
    [
        "siren",
        "nom_entreprise",
        "adresse",
        "Nom_dirigeant",
        "Chiffre_daffaire",
        "url_linkedin_entreprise",
        "url_linkedin_dirigeant",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect()
}

fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn config() -> RunConfig {
    RunConfig {
        row_delay: Duration::ZERO,
        ..RunConfig::default()
    }
}

fn runner(renderer: MockRenderer, searcher: MockSearcher, config: RunConfig) -> BatchRunner {
    let registry = RegistryScraper::new(renderer)
        .with_base_url("https://registry.test/entreprise")
        .with_settle_delay(Duration::ZERO);
    let columns = ColumnMap::from_headers(&headers()).unwrap();

    BatchRunner::new(Arc::new(registry), Arc::new(searcher), columns, config)
}

#[tokio::test]
async fn test_empty_row_is_fully_enriched_with_fetched_director() {
    let renderer = MockRenderer::new()
        .with_text(director_selector(), "Jane Doe")
        .with_text(revenue_selector(), "€1M");
    let sessions = renderer.open_sessions();

    let searcher = MockSearcher::new()
        .with_urls(
            "Acme LinkedIn company",
            &[
                "https://acme.example/about",
                "https://www.linkedin.com/company/acme",
            ],
        )
        .with_urls(
            "Jane Doe Acme LinkedIn",
            &[
                "https://www.linkedin.com/company/acme",
                "https://www.linkedin.com/in/jane-doe",
            ],
        );
    let queries = searcher.queries();

    let store = MockSheetStore::new(SheetSnapshot::new(
        headers(),
        vec![cells(&["123", "Acme", "1 rue de Paris"])],
    ));

    let report = runner(renderer, searcher, config()).run(&store).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(
        store.writes(),
        vec![vec![
            CellUpdate::new(2, 4, "Jane Doe"),
            CellUpdate::new(2, 5, "€1M"),
            CellUpdate::new(2, 6, "https://www.linkedin.com/company/acme"),
            CellUpdate::new(2, 7, "https://www.linkedin.com/in/jane-doe"),
        ]]
    );
    assert_eq!(
        queries.lock().unwrap().as_slice(),
        ["Acme LinkedIn company", "Jane Doe Acme LinkedIn"]
    );
    assert_eq!(sessions.current(), 0);
}

#[tokio::test]
async fn test_unreachable_registry_writes_sentinels_and_continues() {
    let renderer = MockRenderer::new().failing_navigation();
    let sessions = renderer.open_sessions();

    let store = MockSheetStore::new(SheetSnapshot::new(
        headers(),
        vec![
            cells(&["111", "Alpha"]),
            cells(&["222", "Beta", "", "", "", "https://linkedin.com/company/beta"]),
        ],
    ));

    let report = runner(renderer, MockSearcher::new(), config())
        .run(&store)
        .await
        .unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(
        store.writes(),
        vec![vec![
            CellUpdate::new(2, 4, REGISTRY_NOT_FOUND),
            CellUpdate::new(2, 5, REGISTRY_NOT_FOUND),
            CellUpdate::new(2, 6, LINK_NOT_FOUND),
            CellUpdate::new(3, 4, REGISTRY_NOT_FOUND),
            CellUpdate::new(3, 5, REGISTRY_NOT_FOUND),
        ]]
    );
    assert_eq!(sessions.current(), 0);
    assert_eq!(sessions.total_opened(), 2);
}

#[tokio::test]
async fn test_fully_populated_rows_never_touch_the_registry() {
    let renderer = MockRenderer::new();
    let sessions = renderer.open_sessions();
    let searcher = MockSearcher::new();
    let queries = searcher.queries();

    let store = MockSheetStore::new(SheetSnapshot::new(
        headers(),
        vec![cells(&[
            "123",
            "Acme",
            "",
            "Jane Doe",
            "€1M",
            "https://linkedin.com/company/acme",
            "https://linkedin.com/in/jane",
        ])],
    ));

    let report = runner(renderer, searcher, config()).run(&store).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.updates_written, 0);
    assert_eq!(sessions.total_opened(), 0);
    assert!(queries.lock().unwrap().is_empty());
    assert!(store.writes().is_empty());
    assert_eq!(store.reads(), 1);
}

#[tokio::test]
async fn test_search_outage_under_not_found_policy_still_writes() {
    let renderer = MockRenderer::new().with_text(director_selector(), "Jane Doe");
    let searcher = MockSearcher::new()
        .failing("Acme LinkedIn company")
        .failing("Jane Doe Acme LinkedIn");

    let store = MockSheetStore::new(SheetSnapshot::new(
        headers(),
        vec![cells(&["123", "Acme"])],
    ));

    let config = RunConfig {
        search_failure: SearchFailurePolicy::NotFound,
        ..config()
    };
    let report = runner(renderer, searcher, config).run(&store).await.unwrap();

    assert_eq!(report.updates_written, 4);
    assert_eq!(
        store.writes()[0],
        vec![
            CellUpdate::new(2, 4, "Jane Doe"),
            CellUpdate::new(2, 5, REGISTRY_NOT_FOUND),
            CellUpdate::new(2, 6, LINK_NOT_FOUND),
            CellUpdate::new(2, 7, LINK_NOT_FOUND),
        ]
    );
}

#[tokio::test]
async fn test_write_failure_surfaces_as_store_error() {
    let store = MockSheetStore::new(SheetSnapshot::new(
        headers(),
        vec![cells(&["123", "Acme"])],
    ))
    .failing_writes();

    let err = runner(MockRenderer::new(), MockSearcher::new(), config())
        .run(&store)
        .await
        .unwrap_err();

    assert!(matches!(err, EnrichmentError::Store(_)));
}
