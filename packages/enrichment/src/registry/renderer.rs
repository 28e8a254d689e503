//! Render session abstraction over a headless browser.
//!
//! Sessions are blocking; the registry scraper drives them from
//! `spawn_blocking`. Dropping a session must release the page and the
//! browser process.

use std::time::Duration;

use crate::error::RenderResult;

/// A DOM query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Css(String),
    XPath(String),
}

impl Selector {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }
}

/// An open page in a running browser.
pub trait RenderSession {
    /// Navigate and wait for the load to finish, bounded by `timeout`.
    fn navigate(&mut self, url: &str, timeout: Duration) -> RenderResult<()>;

    /// Rendered text of the first element matching `selector`.
    ///
    /// `Ok(None)` when nothing matches; `Err` when the element exists but
    /// cannot be read.
    fn inner_text(&self, selector: &Selector) -> RenderResult<Option<String>>;
}

/// Factory for render sessions. One session per registry lookup.
pub trait PageRenderer: Send + Sync + 'static {
    type Session: RenderSession;

    fn open(&self) -> RenderResult<Self::Session>;
}
