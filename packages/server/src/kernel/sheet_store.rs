//! `SheetStore` backed by a Google Sheets worksheet.

use anyhow::{Context, Result};
use async_trait::async_trait;
use enrichment::{CellUpdate, SheetSnapshot, SheetStore, StoreError};
use sheets_client::{cell_ref, sheet_range, ServiceAccountAuth, ServiceAccountKey, SheetsClient, ValueRange};
use std::sync::Arc;

use crate::config::{Config, SpreadsheetLocator};

/// Columns read per row. Wide enough for any realistic company sheet.
const READ_COLUMNS: &str = "A:ZZ";

pub struct GoogleSheetStore {
    client: SheetsClient,
    spreadsheet_id: String,
    sheet_title: String,
}

impl GoogleSheetStore {
    pub fn new(
        client: SheetsClient,
        spreadsheet_id: impl Into<String>,
        sheet_title: impl Into<String>,
    ) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_title: sheet_title.into(),
        }
    }

    /// Authenticate, resolve the spreadsheet and pick its first worksheet.
    pub async fn connect(config: &Config) -> Result<Self> {
        let key = ServiceAccountKey::from_json(config.google_credentials.expose())
            .context("GOOGLE_SHEETS_CREDENTIALS is not a valid service account key")?;
        let auth = ServiceAccountAuth::new(key).context("Failed to load service account key")?;
        let client = SheetsClient::new(Arc::new(auth));

        let spreadsheet_id = match &config.spreadsheet {
            SpreadsheetLocator::Id(id) => id.clone(),
            SpreadsheetLocator::Name(name) => client
                .find_spreadsheet_by_name(name)
                .await
                .with_context(|| format!("Failed to open spreadsheet '{}'", name))?,
        };

        let sheet_title = client
            .first_sheet_title(&spreadsheet_id)
            .await
            .context("Failed to read worksheet list")?;

        tracing::info!(spreadsheet_id = %spreadsheet_id, sheet = %sheet_title, "Spreadsheet resolved");

        Ok(Self::new(client, spreadsheet_id, sheet_title))
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn sheet_title(&self) -> &str {
        &self.sheet_title
    }
}

/// First row becomes the headers, the rest are data rows.
pub fn split_snapshot(mut values: Vec<Vec<String>>) -> SheetSnapshot {
    if values.is_empty() {
        return SheetSnapshot::default();
    }
    let headers = values.remove(0);
    SheetSnapshot::new(headers, values)
}

/// One single-cell range per update, qualified with the worksheet title.
pub fn value_ranges(sheet_title: &str, updates: &[CellUpdate]) -> Vec<ValueRange> {
    updates
        .iter()
        .map(|update| {
            ValueRange::cell(
                sheet_range(sheet_title, &cell_ref(update.row, update.column)),
                update.value.clone(),
            )
        })
        .collect()
}

#[async_trait]
impl SheetStore for GoogleSheetStore {
    async fn read_all(&self) -> Result<SheetSnapshot, StoreError> {
        let values = self
            .client
            .get_values(&self.spreadsheet_id, &sheet_range(&self.sheet_title, READ_COLUMNS))
            .await
            .map_err(|e| StoreError::Read(Box::new(e)))?;

        Ok(split_snapshot(values))
    }

    async fn batch_update(&self, updates: &[CellUpdate]) -> Result<(), StoreError> {
        let response = self
            .client
            .batch_update_values(&self.spreadsheet_id, value_ranges(&self.sheet_title, updates))
            .await
            .map_err(|e| StoreError::Write(Box::new(e)))?;

        tracing::debug!(cells = response.total_updated_cells, "Sheet updated");
        Ok(())
    }
}
