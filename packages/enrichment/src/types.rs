//! Row, cell and snapshot types shared by the pipeline.

use serde::{Deserialize, Serialize};

use crate::columns::ColumnMap;

/// Header row plus data rows, as read from the sheet in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetSnapshot {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetSnapshot {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// A pending write, in 1-based sheet coordinates.
///
/// The header occupies sheet row 1, so the first data row is sheet row 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub row: usize,
    pub column: usize,
    pub value: String,
}

impl CellUpdate {
    pub fn new(row: usize, column: usize, value: impl Into<String>) -> Self {
        Self {
            row,
            column,
            value: value.into(),
        }
    }
}

/// One business record, with the six logical fields pulled out of a raw row.
///
/// Missing trailing cells read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyRow {
    pub identifier: String,
    pub company_name: String,
    pub director_name: String,
    pub revenue: String,
    pub company_linkedin_url: String,
    pub director_linkedin_url: String,
}

impl CompanyRow {
    pub fn from_cells(cells: &[String], columns: &ColumnMap) -> Self {
        let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();

        Self {
            identifier: cell(columns.identifier),
            company_name: cell(columns.company_name),
            director_name: cell(columns.director_name),
            revenue: cell(columns.revenue),
            company_linkedin_url: cell(columns.company_linkedin_url),
            director_linkedin_url: cell(columns.director_linkedin_url),
        }
    }

    /// Both identifier and company name are present.
    pub fn is_eligible(&self) -> bool {
        !self.identifier.is_empty() && !self.company_name.is_empty()
    }
}
