use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::ParallelFetcher;
use crate::fetcher::Fetcher;

pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub parallel: ParallelFetcher,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::new(&config.scrape)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Wire the context around an externally supplied fetcher.
    /// Used by tests to substitute a mock.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        let parallel = ParallelFetcher::with_workers(fetcher.clone(), config.scrape.workers);
        Self {
            config,
            fetcher,
            parallel,
        }
    }
}
