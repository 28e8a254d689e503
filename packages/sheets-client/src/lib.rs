//! Pure Google Sheets REST API client.
//!
//! A minimal client for the Sheets v4 and Drive v3 APIs: locate a
//! spreadsheet by name, read a range of values, and write many ranges in one
//! `values:batchUpdate` call.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheets_client::{ServiceAccountAuth, ServiceAccountKey, SheetsClient};
//!
//! let key = ServiceAccountKey::from_json(&credentials_json)?;
//! let client = SheetsClient::new(Arc::new(ServiceAccountAuth::new(key)?));
//!
//! let spreadsheet_id = client.find_spreadsheet_by_name("base_insee").await?;
//! let title = client.first_sheet_title(&spreadsheet_id).await?;
//! let rows = client.get_values(&spreadsheet_id, &sheet_range(&title, "A:Z")).await?;
//! ```

pub mod a1;
pub mod auth;
pub mod error;
pub mod types;

pub use a1::{cell_ref, column_letters, sheet_range};
pub use auth::{ServiceAccountAuth, ServiceAccountKey, StaticToken, TokenProvider};
pub use error::{Result, SheetsError};
pub use types::{BatchUpdateValuesResponse, DriveFile, ValueRange};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use types::{BatchUpdateValuesRequest, DriveFileList, SpreadsheetMetadata, ValuesResponse};

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
const DRIVE_BASE_URL: &str = "https://www.googleapis.com";

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

pub struct SheetsClient {
    client: reqwest::Client,
    auth: Arc<dyn TokenProvider>,
    sheets_base_url: String,
    drive_base_url: String,
}

impl SheetsClient {
    pub fn new(auth: Arc<dyn TokenProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth,
            sheets_base_url: SHEETS_BASE_URL.to_string(),
            drive_base_url: DRIVE_BASE_URL.to_string(),
        }
    }

    /// Override both API hosts (tests, proxies).
    pub fn with_base_urls(mut self, sheets: impl Into<String>, drive: impl Into<String>) -> Self {
        self.sheets_base_url = sheets.into();
        self.drive_base_url = drive.into();
        self
    }

    /// Id of the first non-trashed spreadsheet with this exact title.
    pub async fn find_spreadsheet_by_name(&self, name: &str) -> Result<String> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME_TYPE
        );
        let url = self.endpoint(&self.drive_base_url, &["drive", "v3", "files"])?;

        let resp = self
            .client
            .get(url)
            .bearer_auth(self.auth.access_token().await?)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await?;

        let list: DriveFileList = Self::parse(resp).await?;
        list.files
            .into_iter()
            .next()
            .map(|file| file.id)
            .ok_or_else(|| SheetsError::NotFound(format!("spreadsheet named '{}'", name)))
    }

    /// Title of the first worksheet.
    pub async fn first_sheet_title(&self, spreadsheet_id: &str) -> Result<String> {
        let url = self.endpoint(&self.sheets_base_url, &["v4", "spreadsheets", spreadsheet_id])?;

        let resp = self
            .client
            .get(url)
            .bearer_auth(self.auth.access_token().await?)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await?;

        let metadata: SpreadsheetMetadata = Self::parse(resp).await?;
        metadata
            .sheets
            .into_iter()
            .next()
            .map(|sheet| sheet.properties.title)
            .ok_or_else(|| SheetsError::NotFound(format!("worksheet in {}", spreadsheet_id)))
    }

    /// Values in `range` as strings, row-major. Trailing empty cells are
    /// omitted by the API, so rows can be ragged.
    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.endpoint(
            &self.sheets_base_url,
            &["v4", "spreadsheets", spreadsheet_id, "values", range],
        )?;

        let resp = self
            .client
            .get(url)
            .bearer_auth(self.auth.access_token().await?)
            .send()
            .await?;

        let values: ValuesResponse = Self::parse(resp).await?;
        Ok(values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    /// Write every range in one call, values stored as given.
    pub async fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        data: Vec<ValueRange>,
    ) -> Result<BatchUpdateValuesResponse> {
        let url = self.endpoint(
            &self.sheets_base_url,
            &["v4", "spreadsheets", spreadsheet_id, "values:batchUpdate"],
        )?;

        let request = BatchUpdateValuesRequest {
            value_input_option: "RAW",
            data,
        };

        tracing::debug!(spreadsheet_id, ranges = request.data.len(), "Sending batch update");

        let resp = self
            .client
            .post(url)
            .bearer_auth(self.auth.access_token().await?)
            .json(&request)
            .send()
            .await?;

        Self::parse(resp).await
    }

    /// Join path segments onto a base URL, percent-encoding each one.
    fn endpoint(&self, base: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(base)?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp.json().await?)
    }
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
