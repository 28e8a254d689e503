//! Production collaborators for the enrichment pipeline.

use std::sync::Arc;

use enrichment::{
    BatchRunner, ChromeRenderer, ColumnMap, LinkSearcher, RegistryLookup, RegistryScraper,
    TavilySearcher,
};

use crate::config::Config;

/// Registry scraper over headless Chrome, configured from the environment.
pub fn registry_lookup(config: &Config) -> Arc<dyn RegistryLookup> {
    Arc::new(
        RegistryScraper::new(ChromeRenderer::new(config.chrome_path.clone()))
            .with_base_url(config.registry_base_url.as_str())
            .with_settle_delay(config.registry_settle_delay),
    )
}

pub fn link_searcher(config: &Config) -> Arc<dyn LinkSearcher> {
    Arc::new(
        TavilySearcher::new(config.tavily_api_key.expose())
            .with_api_url(config.tavily_api_url.as_str()),
    )
}

pub fn build_runner(config: &Config, columns: ColumnMap) -> BatchRunner {
    BatchRunner::new(
        registry_lookup(config),
        link_searcher(config),
        columns,
        config.run,
    )
}
