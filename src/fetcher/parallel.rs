use std::sync::Arc;

use tokio::sync::Semaphore;
use url::Url;

use crate::app::Result;
use crate::fetcher::Fetcher;

pub const DEFAULT_WORKERS: usize = 10;

/// Semaphore-gated fan-out over independent page fetches.
///
/// Used for film-runtime lookups: each target is independent, one fetch
/// failing never cancels its siblings, and the caller gets a result per
/// key. Diary/ratings pagination never goes through here because each
/// page's existence depends on the previous page being non-empty.
pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers)),
        }
    }

    pub async fn fetch_all(&self, targets: Vec<(String, Url)>) -> Vec<(String, Result<String>)> {
        let mut handles = Vec::with_capacity(targets.len());

        for (key, url) in targets {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                let result = fetcher.get_html(&url).await;
                (key, result)
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!("task join error: {e}");
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::MockFetcher;

    #[tokio::test]
    async fn returns_one_result_per_target() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .page("https://example.com/a/", "<p>a</p>")
                .blocked("https://example.com/b/"),
        );
        let pool = ParallelFetcher::with_workers(fetcher, 2);

        let targets = vec![
            ("a".to_string(), Url::parse("https://example.com/a/").unwrap()),
            ("b".to_string(), Url::parse("https://example.com/b/").unwrap()),
        ];
        let mut results = pool.fetch_all(targets).await;
        results.sort_by(|(a, _), (b, _)| a.cmp(b));

        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
    }
}
