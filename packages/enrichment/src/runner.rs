//! Bounded batch run over the sheet.
//!
//! ```text
//! Idle ─► Scanning ─┬─► Skip (ineligible, not counted)
//!                   └─► Process ─► pacing delay ─► cap reached? ─► Writing ─► Done
//!                                                  rows exhausted? ┘
//! ```
//!
//! One read, at most one write. An error anywhere during the scan aborts the
//! run and drops every update collected so far.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::columns::ColumnMap;
use crate::error::Result;
use crate::policy::{RowEnrichmentPolicy, SearchFailurePolicy};
use crate::registry::RegistryLookup;
use crate::search::LinkSearcher;
use crate::store::SheetStore;
use crate::types::{CellUpdate, CompanyRow};

/// Eligible rows processed per run.
pub const DEFAULT_MAX_ROWS_PER_RUN: usize = 8;

/// Pause after each processed row.
pub const DEFAULT_ROW_DELAY: Duration = Duration::from_secs(1);

/// Sheet row of the first data row (the header is row 1).
const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub max_rows_per_run: usize,
    pub row_delay: Duration,
    pub search_failure: SearchFailurePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_rows_per_run: DEFAULT_MAX_ROWS_PER_RUN,
            row_delay: DEFAULT_ROW_DELAY,
            search_failure: SearchFailurePolicy::default(),
        }
    }
}

/// Updates collected by a scan, before they are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub updates: Vec<CellUpdate>,
    pub processed: usize,
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub processed: usize,
    pub updates_written: usize,
}

pub struct BatchRunner {
    policy: RowEnrichmentPolicy,
    columns: ColumnMap,
    config: RunConfig,
}

impl BatchRunner {
    pub fn new(
        registry: Arc<dyn RegistryLookup>,
        searcher: Arc<dyn LinkSearcher>,
        columns: ColumnMap,
        config: RunConfig,
    ) -> Self {
        Self {
            policy: RowEnrichmentPolicy::new(registry, searcher, columns, config.search_failure),
            columns,
            config,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Walk data rows in order, enriching up to the per-run cap.
    pub async fn scan(&self, rows: &[Vec<String>]) -> Result<ScanOutcome> {
        let mut outcome = ScanOutcome::default();

        if self.config.max_rows_per_run == 0 {
            return Ok(outcome);
        }

        for (index, cells) in rows.iter().enumerate() {
            let sheet_row = index + FIRST_DATA_ROW;
            let row = CompanyRow::from_cells(cells, &self.columns);

            if !row.is_eligible() {
                debug!(sheet_row, "Skipping row without siren or company name");
                continue;
            }

            let updates = self.policy.enrich(&row, sheet_row).await?;
            outcome.updates.extend(updates);
            outcome.processed += 1;

            tokio::time::sleep(self.config.row_delay).await;

            if outcome.processed >= self.config.max_rows_per_run {
                debug!(processed = outcome.processed, "Per-run cap reached");
                break;
            }
        }

        Ok(outcome)
    }

    /// Read the sheet, scan it, and write every update in one call.
    pub async fn run(&self, store: &dyn SheetStore) -> Result<RunReport> {
        let snapshot = store.read_all().await?;
        info!(rows = snapshot.rows.len(), "Starting enrichment run");

        let outcome = self.scan(&snapshot.rows).await?;

        if !outcome.updates.is_empty() {
            store.batch_update(&outcome.updates).await?;
        }

        info!(
            processed = outcome.processed,
            updates = outcome.updates.len(),
            "Enrichment run complete"
        );

        Ok(RunReport {
            processed: outcome.processed,
            updates_written: outcome.updates.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnrichmentError;
    use crate::registry::{FieldLookup, RegistryRecord};
    use crate::testing::{test_columns, test_headers, MockRegistry, MockSearcher, MockSheetStore};
    use crate::types::SheetSnapshot;

    fn runner(registry: MockRegistry, searcher: MockSearcher, config: RunConfig) -> BatchRunner {
        BatchRunner::new(Arc::new(registry), Arc::new(searcher), test_columns(), config)
    }

    fn fast_config() -> RunConfig {
        RunConfig {
            row_delay: Duration::ZERO,
            ..RunConfig::default()
        }
    }

    fn row(siren: &str, name: &str) -> Vec<String> {
        vec![siren.to_string(), name.to_string()]
    }

    fn complete_row(siren: &str, name: &str) -> Vec<String> {
        [siren, name, "Jane Doe", "€1M", "https://linkedin.com/company/x", "https://linkedin.com/in/y"]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_twenty_eligible_rows_stop_at_cap() {
        let registry = MockRegistry::new();
        let calls = registry.calls();
        let runner = runner(registry, MockSearcher::new(), fast_config());

        let rows: Vec<_> = (0..20).map(|i| row(&i.to_string(), "Acme")).collect();
        let outcome = runner.scan(&rows).await.unwrap();

        assert_eq!(outcome.processed, 8);
        assert_eq!(calls.lock().unwrap().len(), 8);
        assert_eq!(outcome.updates.last().unwrap().row, 9);
    }

    #[tokio::test]
    async fn test_ineligible_rows_do_not_count_toward_cap() {
        let registry = MockRegistry::new();
        let calls = registry.calls();
        let config = RunConfig {
            max_rows_per_run: 2,
            ..fast_config()
        };
        let runner = runner(registry, MockSearcher::new(), config);

        let rows = vec![
            row("", "No Siren"),
            row("1", ""),
            row("2", "Beta"),
            vec![],
            row("3", "Gamma"),
            row("4", "Delta"),
        ];
        let outcome = runner.scan(&rows).await.unwrap();

        assert_eq!(outcome.processed, 2);
        assert_eq!(calls.lock().unwrap().as_slice(), ["2", "3"]);
        assert!(outcome.updates.iter().all(|u| u.row == 4 || u.row == 6));
    }

    #[tokio::test]
    async fn test_three_rows_processed_and_written_once() {
        let store = MockSheetStore::new(SheetSnapshot::new(
            test_headers(),
            vec![row("1", "Alpha"), row("2", "Beta"), row("3", "Gamma")],
        ));
        let runner = runner(MockRegistry::new(), MockSearcher::new(), fast_config());

        let report = runner.run(&store).await.unwrap();

        assert_eq!(report.processed, 3);
        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        // director, revenue, company link per row; no director link without a director
        assert_eq!(writes[0].len(), 9);
        assert_eq!(report.updates_written, 9);
    }

    #[tokio::test]
    async fn test_no_updates_means_no_write() {
        let store = MockSheetStore::new(SheetSnapshot::new(
            test_headers(),
            vec![complete_row("1", "Alpha"), complete_row("2", "Beta")],
        ));
        let runner = runner(MockRegistry::new(), MockSearcher::new(), fast_config());

        let report = runner.run(&store).await.unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(report.updates_written, 0);
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_discards_collected_updates() {
        let store = MockSheetStore::new(SheetSnapshot::new(
            test_headers(),
            vec![row("1", "Alpha"), row("2", "Beta")],
        ));
        let registry = MockRegistry::new().with_record(
            "1",
            RegistryRecord::new(FieldLookup::NotFound, FieldLookup::Found("€1M".into())),
        );
        let searcher = MockSearcher::new().failing("Beta LinkedIn company");
        let runner = runner(registry, searcher, fast_config());

        let err = runner.run(&store).await.unwrap_err();

        assert!(matches!(err, EnrichmentError::Search(_)));
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_zero_cap_processes_nothing() {
        let registry = MockRegistry::new();
        let calls = registry.calls();
        let config = RunConfig {
            max_rows_per_run: 0,
            ..fast_config()
        };
        let runner = runner(registry, MockSearcher::new(), config);

        let outcome = runner.scan(&[row("1", "Alpha")]).await.unwrap();

        assert_eq!(outcome, ScanOutcome::default());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_delay_after_each_processed_row() {
        let config = RunConfig {
            max_rows_per_run: 3,
            row_delay: Duration::from_secs(1),
            ..RunConfig::default()
        };
        let runner = runner(MockRegistry::new(), MockSearcher::new(), config);
        let rows = vec![row("1", "Alpha"), row("", "skip"), row("2", "Beta")];

        let started = tokio::time::Instant::now();
        let outcome = runner.scan(&rows).await.unwrap();

        assert_eq!(outcome.processed, 2);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
    }
}
