pub mod http_fetcher;
pub mod parallel;

use async_trait::async_trait;
use url::Url;

use crate::app::Result;

#[async_trait]
pub trait Fetcher {
    /// Fetch one page of HTML.
    ///
    /// Fails with [`ScrapeError::Blocked`](crate::app::ScrapeError::Blocked)
    /// when the body matches an anti-bot signature after retries, and with
    /// [`ScrapeError::UpstreamStatus`](crate::app::ScrapeError::UpstreamStatus)
    /// on a non-2xx response.
    async fn get_html(&self, url: &Url) -> Result<String>;
}
