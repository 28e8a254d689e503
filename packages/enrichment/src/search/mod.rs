//! Web search and LinkedIn link extraction.

pub mod tavily;

use async_trait::async_trait;

use crate::error::SearchResult;
pub use tavily::TavilySearcher;

/// Cell value written when no search result matches the wanted profile kind.
pub const LINK_NOT_FOUND: &str = "non trouvé";

/// Result cap used by every enrichment query.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Web search returning result URLs in provider rank order.
#[async_trait]
pub trait LinkSearcher: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> SearchResult<Vec<String>>;
}

/// Kind of LinkedIn profile a search is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPattern {
    Company,
    Person,
}

impl LinkPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "linkedin.com/company/",
            Self::Person => "linkedin.com/in/",
        }
    }

    /// First URL containing this pattern, or `LINK_NOT_FOUND`.
    pub fn first_match(&self, urls: &[String]) -> String {
        first_match(urls, self.as_str())
    }
}

/// First URL in order containing `pattern` as a plain substring.
///
/// No URL-structure validation: the pattern may appear anywhere.
pub fn first_match(urls: &[String], pattern: &str) -> String {
    urls.iter()
        .find(|url| url.contains(pattern))
        .cloned()
        .unwrap_or_else(|| LINK_NOT_FOUND.to_string())
}
