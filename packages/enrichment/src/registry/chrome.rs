//! Headless Chrome renderer.
//!
//! Each session owns its own Chrome process. Dropping the session closes the
//! tab, then dropping the `Browser` kills the process.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::debug;

use super::renderer::{PageRenderer, RenderSession, Selector};
use crate::error::{RenderError, RenderResult};

/// Launches a fresh headless Chrome for every session.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer {
    chrome_path: Option<PathBuf>,
    sandbox: bool,
}

impl ChromeRenderer {
    /// Sandbox is disabled automatically inside a container
    /// (detected via /.dockerenv or the ENRICH_CONTAINER env var).
    pub fn new(chrome_path: Option<PathBuf>) -> Self {
        let is_container = std::env::var("ENRICH_CONTAINER").is_ok()
            || Path::new("/.dockerenv").exists();

        Self {
            chrome_path,
            sandbox: !is_container,
        }
    }

    fn launch_options(&self) -> RenderResult<LaunchOptions<'static>> {
        LaunchOptions::default_builder()
            .headless(true)
            .sandbox(self.sandbox)
            .path(self.chrome_path.clone())
            .build()
            .map_err(|e| RenderError::Launch(format!("invalid launch options: {}", e)))
    }
}

impl PageRenderer for ChromeRenderer {
    type Session = ChromeSession;

    fn open(&self) -> RenderResult<ChromeSession> {
        let browser = Browser::new(self.launch_options()?)
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| RenderError::Launch(format!("failed to create tab: {}", e)))?;

        Ok(ChromeSession {
            tab,
            _browser: browser,
        })
    }
}

/// A tab plus the browser that owns it.
///
/// Field order matters: the tab handle is dropped before the browser.
pub struct ChromeSession {
    tab: Arc<Tab>,
    _browser: Browser,
}

impl RenderSession for ChromeSession {
    fn navigate(&mut self, url: &str, timeout: Duration) -> RenderResult<()> {
        self.tab.set_default_timeout(timeout);

        self.tab
            .navigate_to(url)
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }

    fn inner_text(&self, selector: &Selector) -> RenderResult<Option<String>> {
        let found = match selector {
            Selector::Css(css) => self.tab.find_element(css),
            Selector::XPath(xpath) => self.tab.find_element_by_xpath(xpath),
        };

        let element = match found {
            Ok(element) => element,
            Err(e) => {
                debug!(?selector, error = %e, "Element not found");
                return Ok(None);
            }
        };

        element
            .get_inner_text()
            .map(Some)
            .map_err(|e| RenderError::Query(e.to_string()))
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(false) {
            debug!(error = %e, "Failed to close tab, browser shutdown will reap it");
        }
    }
}
