//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod job;
pub mod scheduled_tasks;
pub mod sheet_store;

pub use deps::build_runner;
pub use job::EnrichmentJob;
pub use scheduled_tasks::start_scheduler;
pub use sheet_store::GoogleSheetStore;
