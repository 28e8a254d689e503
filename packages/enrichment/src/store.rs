//! Tabular data store abstraction.
//!
//! The spreadsheet itself lives outside this crate. The server adapts the
//! Google Sheets client to this trait; tests use `testing::MockSheetStore`.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{CellUpdate, SheetSnapshot};

#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Read every row, with the header row separated out.
    async fn read_all(&self) -> Result<SheetSnapshot, StoreError>;

    /// Apply all cell writes in one call.
    async fn batch_update(&self, updates: &[CellUpdate]) -> Result<(), StoreError>;
}
