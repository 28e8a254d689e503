// Company enrichment - server core
//
// Wires the enrichment pipeline to Google Sheets, headless Chrome and
// Tavily, and exposes the run behind an HTTP trigger and an optional
// cron schedule.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
