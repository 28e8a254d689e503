//! Scheduled enrichment runs using tokio-cron-scheduler.
//!
//! The scheduled run goes through the same `EnrichmentJob` as the HTTP
//! trigger, so a cron tick and a manual trigger never overlap.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_cron_scheduler::{Job, JobScheduler};

use super::job::EnrichmentJob;

/// Start the enrichment schedule (six-field cron, seconds first).
pub async fn start_scheduler(job: Arc<EnrichmentJob>, schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let enrich_job = Job::new_async(schedule, move |_uuid, _lock| {
        let job = job.clone();
        Box::pin(async move {
            match job.run_once().await {
                Ok(report) => tracing::info!(
                    processed = report.processed,
                    updates = report.updates_written,
                    "Scheduled enrichment run finished"
                ),
                Err(e) => tracing::error!("Scheduled enrichment run failed: {}", e),
            }
        })
    })
    .with_context(|| format!("Invalid ENRICH_SCHEDULE '{}'", schedule))?;

    scheduler.add(enrich_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule, "Scheduled enrichment started");
    Ok(scheduler)
}
