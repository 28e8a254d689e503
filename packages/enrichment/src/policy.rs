//! Per-row enrichment decisions.
//!
//! Each field is considered on its own and a populated cell is never
//! overwritten. The only dependency between steps is the director name: a
//! name found on the registry page in step 1 feeds the director's LinkedIn
//! search in step 3 of the same pass.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::columns::ColumnMap;
use crate::error::{Result, SearchError};
use crate::registry::RegistryLookup;
use crate::search::{LinkPattern, LinkSearcher, DEFAULT_MAX_RESULTS, LINK_NOT_FOUND};
use crate::types::{CellUpdate, CompanyRow};

/// What to do when the search provider fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchFailurePolicy {
    /// Propagate the error and abort the run without writing anything.
    #[default]
    Abort,
    /// Write `LINK_NOT_FOUND` for that field and carry on.
    NotFound,
}

impl FromStr for SearchFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "not_found" | "notfound" => Ok(Self::NotFound),
            other => Err(format!(
                "unknown search failure policy '{}', expected 'abort' or 'not_found'",
                other
            )),
        }
    }
}

pub struct RowEnrichmentPolicy {
    registry: Arc<dyn RegistryLookup>,
    searcher: Arc<dyn LinkSearcher>,
    columns: ColumnMap,
    on_search_failure: SearchFailurePolicy,
}

impl RowEnrichmentPolicy {
    pub fn new(
        registry: Arc<dyn RegistryLookup>,
        searcher: Arc<dyn LinkSearcher>,
        columns: ColumnMap,
        on_search_failure: SearchFailurePolicy,
    ) -> Self {
        Self {
            registry,
            searcher,
            columns,
            on_search_failure,
        }
    }

    /// Decide, fetch and produce the cell updates for one row.
    ///
    /// `sheet_row` is the 1-based sheet row the updates target.
    pub async fn enrich(&self, row: &CompanyRow, sheet_row: usize) -> Result<Vec<CellUpdate>> {
        if !row.is_eligible() {
            return Ok(Vec::new());
        }

        let mut updates = Vec::new();
        let mut director = row.director_name.clone();

        // Step 1: registry page
        if row.director_name.is_empty() || row.revenue.is_empty() {
            let record = self.registry.fetch(&row.identifier).await;

            if row.director_name.is_empty() {
                updates.push(self.update(
                    sheet_row,
                    self.columns.director_name,
                    record.director.cell_value(),
                ));
                if let Some(name) = record.director.found() {
                    director = name.to_string();
                }
            }

            if row.revenue.is_empty() {
                updates.push(self.update(
                    sheet_row,
                    self.columns.revenue,
                    record.revenue.cell_value(),
                ));
            }
        }

        // Steps 2 and 3 are siblings: a failed company search still lets
        // the director search run before the failure is reported.
        let mut failure: Option<SearchError> = None;

        if row.company_linkedin_url.is_empty() {
            let query = format!("{} LinkedIn company", row.company_name);
            if let Some(url) = self
                .find_profile(&query, LinkPattern::Company, &mut failure)
                .await
            {
                updates.push(self.update(sheet_row, self.columns.company_linkedin_url, url));
            }
        }

        if !director.is_empty() && row.director_linkedin_url.is_empty() {
            let query = format!("{} {} LinkedIn", director, row.company_name);
            if let Some(url) = self
                .find_profile(&query, LinkPattern::Person, &mut failure)
                .await
            {
                updates.push(self.update(sheet_row, self.columns.director_linkedin_url, url));
            }
        }

        if let Some(e) = failure {
            return Err(e.into());
        }

        debug!(
            siren = %row.identifier,
            sheet_row,
            updates = updates.len(),
            "Row enriched"
        );
        Ok(updates)
    }

    /// Search and pick the first matching profile.
    ///
    /// Returns `None` only when the search failed under `Abort`; the first
    /// such error is kept in `failure`.
    async fn find_profile(
        &self,
        query: &str,
        pattern: LinkPattern,
        failure: &mut Option<SearchError>,
    ) -> Option<String> {
        match self.searcher.search(query, DEFAULT_MAX_RESULTS).await {
            Ok(urls) => Some(pattern.first_match(&urls)),
            Err(e) => {
                warn!(query, error = %e, "LinkedIn search failed");
                match self.on_search_failure {
                    SearchFailurePolicy::NotFound => Some(LINK_NOT_FOUND.to_string()),
                    SearchFailurePolicy::Abort => {
                        failure.get_or_insert(e);
                        None
                    }
                }
            }
        }
    }

    fn update(&self, sheet_row: usize, position: usize, value: impl Into<String>) -> CellUpdate {
        CellUpdate::new(sheet_row, ColumnMap::sheet_column(position), value)
    }
}
