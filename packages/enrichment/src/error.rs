//! Typed errors for the enrichment library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the server can
//! distinguish a failed search from a failed sheet write.

use thiserror::Error;

/// Errors that abort an enrichment run.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// Search provider failed and the run is configured to abort
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    /// Reading or writing the spreadsheet failed
    #[error("sheet store error: {0}")]
    Store(#[from] StoreError),

    /// An expected header is absent from the sheet
    #[error("missing expected header: {0}")]
    MissingHeader(String),
}

/// Errors from the web search provider.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("search API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors from a headless render session.
///
/// These never escape the registry lookup; they are logged and turned into
/// `NotFound` values.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Browser process or tab could not be started
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// Navigation failed or exceeded its bound
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// DOM query or text read failed
    #[error("DOM query failed: {0}")]
    Query(String),

    /// The blocking render task panicked or was cancelled
    #[error("render task failed: {0}")]
    Task(String),
}

/// Errors from the tabular data store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read sheet: {0}")]
    Read(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to write sheet: {0}")]
    Write(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for enrichment operations.
pub type Result<T> = std::result::Result<T, EnrichmentError>;

/// Result type alias for search operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Result type alias for render operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
