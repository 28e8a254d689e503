//! The enrichment run as a shared, serialized job.

use std::sync::Arc;

use enrichment::{BatchRunner, EnrichmentError, RunReport, SheetStore};
use tokio::sync::Mutex;

/// Shared by the HTTP trigger and the scheduler.
pub struct EnrichmentJob {
    runner: BatchRunner,
    store: Arc<dyn SheetStore>,
    running: Mutex<()>,
}

impl EnrichmentJob {
    pub fn new(runner: BatchRunner, store: Arc<dyn SheetStore>) -> Self {
        Self {
            runner,
            store,
            running: Mutex::new(()),
        }
    }

    /// Run once. A second caller waits for the first run to finish, so two
    /// runs never scan the same rows at the same time.
    pub async fn run_once(&self) -> Result<RunReport, EnrichmentError> {
        let _guard = self.running.lock().await;
        self.runner.run(self.store.as_ref()).await
    }
}
