use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use enrichment::registry::{DEFAULT_REGISTRY_BASE_URL, SETTLE_DELAY};
use enrichment::search::tavily::DEFAULT_TAVILY_API_URL;
use enrichment::{RunConfig, SearchFailurePolicy, SecretString};

pub const DEFAULT_SPREADSHEET_NAME: &str = "base_insee";

/// Which spreadsheet to enrich.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetLocator {
    Id(String),
    /// Resolved through Drive at startup.
    Name(String),
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub google_credentials: SecretString,
    pub tavily_api_key: SecretString,
    pub tavily_api_url: String,
    pub spreadsheet: SpreadsheetLocator,
    pub registry_base_url: String,
    pub registry_settle_delay: Duration,
    pub chrome_path: Option<PathBuf>,
    pub run: RunConfig,
    /// Six-field cron expression; no scheduler when unset.
    pub schedule: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let spreadsheet = match var("SPREADSHEET_ID") {
            Some(id) => SpreadsheetLocator::Id(id),
            None => SpreadsheetLocator::Name(
                var("SPREADSHEET_NAME").unwrap_or_else(|| DEFAULT_SPREADSHEET_NAME.to_string()),
            ),
        };

        let defaults = RunConfig::default();

        Ok(Self {
            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            google_credentials: var("GOOGLE_SHEETS_CREDENTIALS")
                .context("GOOGLE_SHEETS_CREDENTIALS must be set")?
                .into(),
            tavily_api_key: var("TAVILY_API_KEY")
                .context("TAVILY_API_KEY must be set")?
                .into(),
            tavily_api_url: var("TAVILY_API_URL")
                .unwrap_or_else(|| DEFAULT_TAVILY_API_URL.to_string()),
            spreadsheet,
            registry_base_url: var("REGISTRY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_REGISTRY_BASE_URL.to_string()),
            registry_settle_delay: match var("REGISTRY_SETTLE_MS") {
                Some(ms) => Duration::from_millis(
                    ms.parse()
                        .context("REGISTRY_SETTLE_MS must be a number of milliseconds")?,
                ),
                None => SETTLE_DELAY,
            },
            chrome_path: var("CHROME_PATH").map(PathBuf::from),
            run: RunConfig {
                max_rows_per_run: match var("ENRICH_MAX_ROWS") {
                    Some(n) => n.parse().context("ENRICH_MAX_ROWS must be a valid number")?,
                    None => defaults.max_rows_per_run,
                },
                row_delay: match var("ENRICH_ROW_DELAY_MS") {
                    Some(ms) => Duration::from_millis(
                        ms.parse()
                            .context("ENRICH_ROW_DELAY_MS must be a number of milliseconds")?,
                    ),
                    None => defaults.row_delay,
                },
                search_failure: match var("ENRICH_SEARCH_FAILURE") {
                    Some(policy) => policy.parse::<SearchFailurePolicy>().map_err(|e| anyhow!(e))?,
                    None => defaults.search_failure,
                },
            },
            schedule: var("ENRICH_SCHEDULE"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("GOOGLE_SHEETS_CREDENTIALS", r#"{"client_email":"a","private_key":"b"}"#),
        ("TAVILY_API_KEY", "tvly-123"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(
            config.spreadsheet,
            SpreadsheetLocator::Name("base_insee".to_string())
        );
        assert_eq!(config.registry_base_url, DEFAULT_REGISTRY_BASE_URL);
        assert_eq!(config.registry_settle_delay, Duration::from_secs(3));
        assert_eq!(config.run, RunConfig::default());
        assert_eq!(config.run.max_rows_per_run, 8);
        assert_eq!(config.run.row_delay, Duration::from_secs(1));
        assert!(config.schedule.is_none());
        assert!(config.chrome_path.is_none());
    }

    #[test]
    fn test_missing_credentials_is_fatal() {
        let err = load(&[("TAVILY_API_KEY", "tvly-123")]).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_SHEETS_CREDENTIALS"));

        let err = load(&[("GOOGLE_SHEETS_CREDENTIALS", "{}")]).unwrap_err();
        assert!(err.to_string().contains("TAVILY_API_KEY"));
    }

    #[test]
    fn test_blank_required_value_counts_as_missing() {
        let err = load(&[
            ("GOOGLE_SHEETS_CREDENTIALS", "{}"),
            ("TAVILY_API_KEY", "  "),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("TAVILY_API_KEY"));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "8080"),
            ("SPREADSHEET_ID", "sheet-123"),
            ("ENRICH_MAX_ROWS", "20"),
            ("ENRICH_ROW_DELAY_MS", "250"),
            ("ENRICH_SEARCH_FAILURE", "not_found"),
            ("ENRICH_SCHEDULE", "0 */15 * * * *"),
            ("REGISTRY_SETTLE_MS", "0"),
        ]);

        let config = load(&pairs).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.spreadsheet, SpreadsheetLocator::Id("sheet-123".into()));
        assert_eq!(config.run.max_rows_per_run, 20);
        assert_eq!(config.run.row_delay, Duration::from_millis(250));
        assert_eq!(config.run.search_failure, SearchFailurePolicy::NotFound);
        assert_eq!(config.schedule.as_deref(), Some("0 */15 * * * *"));
        assert_eq!(config.registry_settle_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ENRICH_MAX_ROWS", "eight"));
        assert!(load(&pairs).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ENRICH_SEARCH_FAILURE", "retry"));
        assert!(load(&pairs).is_err());
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let config = load(&REQUIRED).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("tvly-123"));
        assert!(!debug.contains("private_key"));
    }
}
