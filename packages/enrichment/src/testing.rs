//! Test doubles for the enrichment pipeline.
//!
//! Every mock records what it was asked so tests can assert on call order
//! and on which lookups were skipped.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::columns::ColumnMap;
use crate::error::{RenderError, RenderResult, SearchError, SearchResult, StoreError};
use crate::registry::{PageRenderer, RegistryLookup, RegistryRecord, RenderSession, Selector};
use crate::search::LinkSearcher;
use crate::store::SheetStore;
use crate::types::{CellUpdate, SheetSnapshot};

/// Header row with the six expected columns in a fixed order:
/// siren, nom_entreprise, Nom_dirigeant, Chiffre_daffaire,
/// url_linkedin_entreprise, url_linkedin_dirigeant.
pub fn test_headers() -> Vec<String> {
    [
        "siren",
        "nom_entreprise",
        "Nom_dirigeant",
        "Chiffre_daffaire",
        "url_linkedin_entreprise",
        "url_linkedin_dirigeant",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect()
}

pub fn test_columns() -> ColumnMap {
    ColumnMap::from_headers(&test_headers()).expect("test headers are complete")
}

// =============================================================================
// Registry
// =============================================================================

/// Registry lookup returning canned records. Unknown identifiers are not found.
#[derive(Default)]
pub struct MockRegistry {
    records: HashMap<String, RegistryRecord>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, identifier: &str, record: RegistryRecord) -> Self {
        self.records.insert(identifier.to_string(), record);
        self
    }

    /// Identifiers looked up, in call order.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl RegistryLookup for MockRegistry {
    async fn fetch(&self, identifier: &str) -> RegistryRecord {
        self.calls.lock().unwrap().push(identifier.to_string());
        self.records
            .get(identifier)
            .cloned()
            .unwrap_or_else(RegistryRecord::not_found)
    }
}

// =============================================================================
// Search
// =============================================================================

/// Searcher returning canned URLs per exact query. Unknown queries return
/// no results; queries marked failing return a 500 API error.
#[derive(Default)]
pub struct MockSearcher {
    results: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_urls(mut self, query: &str, urls: &[&str]) -> Self {
        self.results.insert(
            query.to_string(),
            urls.iter().map(|u| u.to_string()).collect(),
        );
        self
    }

    pub fn failing(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    /// Queries issued, in call order.
    pub fn queries(&self) -> Arc<Mutex<Vec<String>>> {
        self.queries.clone()
    }
}

#[async_trait]
impl LinkSearcher for MockSearcher {
    async fn search(&self, query: &str, max_results: usize) -> SearchResult<Vec<String>> {
        self.queries.lock().unwrap().push(query.to_string());

        if self.failing.contains(query) {
            return Err(SearchError::Api {
                status: 500,
                message: "mock search failure".to_string(),
            });
        }

        let mut urls = self.results.get(query).cloned().unwrap_or_default();
        urls.truncate(max_results);
        Ok(urls)
    }
}

// =============================================================================
// Sheet store
// =============================================================================

/// In-memory sheet that records every bulk write.
pub struct MockSheetStore {
    snapshot: SheetSnapshot,
    writes: Arc<Mutex<Vec<Vec<CellUpdate>>>>,
    reads: AtomicUsize,
    fail_writes: bool,
}

impl MockSheetStore {
    pub fn new(snapshot: SheetSnapshot) -> Self {
        Self {
            snapshot,
            writes: Arc::new(Mutex::new(Vec::new())),
            reads: AtomicUsize::new(0),
            fail_writes: false,
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Every `batch_update` call, in order.
    pub fn writes(&self) -> Vec<Vec<CellUpdate>> {
        self.writes.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SheetStore for MockSheetStore {
    async fn read_all(&self) -> Result<SheetSnapshot, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }

    async fn batch_update(&self, updates: &[CellUpdate]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write("mock write failure".into()));
        }
        self.writes.lock().unwrap().push(updates.to_vec());
        Ok(())
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Counts live and total render sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionCounter {
    open: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
}

impl SessionCounter {
    /// Sessions currently alive.
    pub fn current(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Sessions ever opened.
    pub fn total_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

/// Renderer serving canned element text, with switchable failure modes.
#[derive(Default)]
pub struct MockRenderer {
    texts: HashMap<Selector, String>,
    query_errors: HashSet<Selector>,
    fail_launch: bool,
    fail_navigation: bool,
    panic_on_query: bool,
    sessions: SessionCounter,
    visited: Arc<Mutex<Vec<String>>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, selector: Selector, text: &str) -> Self {
        self.texts.insert(selector, text.to_string());
        self
    }

    pub fn with_query_error(mut self, selector: Selector) -> Self {
        self.query_errors.insert(selector);
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    pub fn panicking_query(mut self) -> Self {
        self.panic_on_query = true;
        self
    }

    pub fn open_sessions(&self) -> SessionCounter {
        self.sessions.clone()
    }

    /// URLs navigated to, in order.
    pub fn visited(&self) -> Arc<Mutex<Vec<String>>> {
        self.visited.clone()
    }
}

impl PageRenderer for MockRenderer {
    type Session = MockSession;

    fn open(&self) -> RenderResult<MockSession> {
        if self.fail_launch {
            return Err(RenderError::Launch("mock launch failure".to_string()));
        }

        self.sessions.open.fetch_add(1, Ordering::SeqCst);
        self.sessions.opened.fetch_add(1, Ordering::SeqCst);

        Ok(MockSession {
            texts: self.texts.clone(),
            query_errors: self.query_errors.clone(),
            fail_navigation: self.fail_navigation,
            panic_on_query: self.panic_on_query,
            sessions: self.sessions.clone(),
            visited: self.visited.clone(),
        })
    }
}

pub struct MockSession {
    texts: HashMap<Selector, String>,
    query_errors: HashSet<Selector>,
    fail_navigation: bool,
    panic_on_query: bool,
    sessions: SessionCounter,
    visited: Arc<Mutex<Vec<String>>>,
}

impl RenderSession for MockSession {
    fn navigate(&mut self, url: &str, timeout: Duration) -> RenderResult<()> {
        self.visited.lock().unwrap().push(url.to_string());

        if self.fail_navigation {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                reason: format!("timed out after {:?}", timeout),
            });
        }
        Ok(())
    }

    fn inner_text(&self, selector: &Selector) -> RenderResult<Option<String>> {
        if self.panic_on_query {
            panic!("mock renderer crashed");
        }
        if self.query_errors.contains(selector) {
            return Err(RenderError::Query("node detached".to_string()));
        }
        Ok(self.texts.get(selector).cloned())
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.sessions.open.fetch_sub(1, Ordering::SeqCst);
    }
}
