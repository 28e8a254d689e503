//! Company registry enrichment.
//!
//! Fills the gaps in a company spreadsheet: director name and revenue are
//! scraped from the public registry page, LinkedIn URLs for the company and
//! its director come from a web search. A run is small and bounded; the
//! caller re-invokes it (HTTP trigger, cron) to make further progress.
//!
//! ```rust,ignore
//! use enrichment::{BatchRunner, ChromeRenderer, RegistryScraper, RunConfig, TavilySearcher};
//!
//! let registry = Arc::new(RegistryScraper::new(ChromeRenderer::new(None)));
//! let searcher = Arc::new(TavilySearcher::new(api_key));
//! let runner = BatchRunner::new(registry, searcher, columns, RunConfig::default());
//!
//! let report = runner.run(&store).await?;
//! println!("processed {} rows", report.processed);
//! ```
//!
//! # Modules
//!
//! - [`registry`] - Headless registry page lookup
//! - [`search`] - Web search and LinkedIn link extraction
//! - [`policy`] - Per-row decision logic
//! - [`runner`] - Capped, paced batch run with one bulk write
//! - [`store`] - Spreadsheet abstraction
//! - [`testing`] - Mock implementations for testing

pub mod columns;
pub mod error;
pub mod policy;
pub mod registry;
pub mod runner;
pub mod search;
pub mod security;
pub mod store;
pub mod testing;
pub mod types;

pub use columns::ColumnMap;
pub use error::{EnrichmentError, RenderError, SearchError, StoreError};
pub use policy::{RowEnrichmentPolicy, SearchFailurePolicy};
pub use registry::{
    ChromeRenderer, FieldLookup, PageRenderer, RegistryLookup, RegistryRecord, RegistryScraper,
    RenderSession, Selector, REGISTRY_NOT_FOUND,
};
pub use runner::{BatchRunner, RunConfig, RunReport, ScanOutcome};
pub use search::{first_match, LinkPattern, LinkSearcher, TavilySearcher, LINK_NOT_FOUND};
pub use security::SecretString;
pub use store::SheetStore;
pub use types::{CellUpdate, CompanyRow, SheetSnapshot};
