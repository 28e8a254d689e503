//! Company registry lookup.
//!
//! The registry page builds its content client-side, so it is rendered in a
//! headless browser rather than fetched as HTML. The director and revenue
//! blocks are read independently: either one can be missing without
//! affecting the other, and a page that fails to load yields `NotFound` for
//! both. Nothing here ever returns an error to the caller.

pub mod chrome;
pub mod renderer;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{RenderError, RenderResult};
pub use chrome::{ChromeRenderer, ChromeSession};
pub use renderer::{PageRenderer, RenderSession, Selector};

/// Cell value written when a registry field could not be obtained.
pub const REGISTRY_NOT_FOUND: &str = "Non trouvé";

pub const DEFAULT_REGISTRY_BASE_URL: &str = "https://www.infogreffe.fr/entreprise";

/// Upper bound on page navigation.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Fixed wait after navigation for client-side content to populate.
pub const SETTLE_DELAY: Duration = Duration::from_secs(3);

const DIRECTOR_XPATH: &str =
    "//div[@data-testid='block-representant-legal']//div[contains(@class, 'textData')]";
const REVENUE_CSS: &str = "div[data-testid='ca']";

/// Outcome of reading one data point off the registry page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLookup {
    Found(String),
    NotFound,
}

impl FieldLookup {
    /// Blank text counts as not found.
    pub fn from_text(text: Option<String>) -> Self {
        match text.map(|t| t.trim().to_string()) {
            Some(t) if !t.is_empty() => Self::Found(t),
            _ => Self::NotFound,
        }
    }

    pub fn found(&self) -> Option<&str> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    /// Value to write into the sheet.
    pub fn cell_value(&self) -> &str {
        self.found().unwrap_or(REGISTRY_NOT_FOUND)
    }
}

/// Director and revenue for one business identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRecord {
    pub director: FieldLookup,
    pub revenue: FieldLookup,
}

impl RegistryRecord {
    pub fn new(director: FieldLookup, revenue: FieldLookup) -> Self {
        Self { director, revenue }
    }

    pub fn not_found() -> Self {
        Self::new(FieldLookup::NotFound, FieldLookup::NotFound)
    }
}

#[async_trait]
pub trait RegistryLookup: Send + Sync {
    /// Never fails: unreachable pages come back as `RegistryRecord::not_found()`.
    async fn fetch(&self, identifier: &str) -> RegistryRecord;
}

/// Registry lookup that renders the company page in a headless browser.
pub struct RegistryScraper<R: PageRenderer> {
    renderer: Arc<R>,
    base_url: String,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl<R: PageRenderer> RegistryScraper<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer: Arc::new(renderer),
            base_url: DEFAULT_REGISTRY_BASE_URL.to_string(),
            navigation_timeout: NAVIGATION_TIMEOUT,
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn page_url(&self, identifier: &str) -> String {
        format!("{}/{}", self.base_url, identifier)
    }
}

#[async_trait]
impl<R: PageRenderer> RegistryLookup for RegistryScraper<R> {
    async fn fetch(&self, identifier: &str) -> RegistryRecord {
        let url = self.page_url(identifier);
        let renderer = self.renderer.clone();
        let navigation_timeout = self.navigation_timeout;
        let settle_delay = self.settle_delay;

        // headless_chrome operations are blocking, run in a blocking thread
        let task = tokio::task::spawn_blocking(move || {
            scrape_page(renderer.as_ref(), &url, navigation_timeout, settle_delay)
        });

        let result = task
            .await
            .unwrap_or_else(|e| Err(RenderError::Task(e.to_string())));

        match result {
            Ok(record) => {
                debug!(siren = identifier, ?record, "Registry lookup complete");
                record
            }
            Err(e) => {
                warn!(siren = identifier, error = %e, "Registry page unreachable");
                RegistryRecord::not_found()
            }
        }
    }
}

/// The session is dropped when this returns, on the error paths included.
fn scrape_page<R: PageRenderer>(
    renderer: &R,
    url: &str,
    navigation_timeout: Duration,
    settle_delay: Duration,
) -> RenderResult<RegistryRecord> {
    let mut session = renderer.open()?;
    session.navigate(url, navigation_timeout)?;

    std::thread::sleep(settle_delay);

    let director = read_field(&session, &director_selector(), "director");
    let revenue = read_field(&session, &revenue_selector(), "revenue");

    Ok(RegistryRecord::new(director, revenue))
}

fn read_field<S: RenderSession>(session: &S, selector: &Selector, field: &str) -> FieldLookup {
    match session.inner_text(selector) {
        Ok(text) => FieldLookup::from_text(text),
        Err(e) => {
            debug!(field, error = %e, "Registry field unreadable");
            FieldLookup::NotFound
        }
    }
}

/// Selector used for the legal representative block.
pub fn director_selector() -> Selector {
    Selector::xpath(DIRECTOR_XPATH)
}

/// Selector used for the revenue block.
pub fn revenue_selector() -> Selector {
    Selector::css(REVENUE_CSS)
}
