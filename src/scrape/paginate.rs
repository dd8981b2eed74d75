//! Sequential pagination driver.
//!
//! Pages are fetched strictly in increasing order because page N+1 is only
//! requested after page N yields at least one record. Each call starts at
//! page 1; there is no mid-run resumption.

use url::Url;

use crate::app::{Result, ScrapeError};
use crate::fetcher::Fetcher;
use crate::scrape::politeness_sleep;

/// Why a pagination run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// A page yielded zero records.
    EndOfData,
    /// The page cap was reached with records still flowing.
    PageCap,
    /// A block page survived all retries mid-run.
    Blocked,
    /// A later page failed with a non-block error.
    Failed,
}

#[derive(Debug)]
pub struct Paged<T> {
    pub records: Vec<T>,
    /// Pages that yielded at least one record.
    pub pages_with_records: u32,
    pub halt: Halt,
}

/// Walk `base`, `base/page/2/`, … collecting parsed records until a page
/// comes back empty, `max_pages` is reached, or a fetch fails.
///
/// A failing first page propagates the error; a failure on any later page
/// degrades to the partial results collected so far.
pub async fn collect<T, P>(
    fetcher: &(dyn Fetcher + Send + Sync),
    base: &Url,
    max_pages: u32,
    delay_ms: u64,
    parse: P,
) -> Result<Paged<T>>
where
    P: Fn(&str) -> Vec<T>,
{
    let mut records = Vec::new();
    let mut pages_with_records = 0u32;
    let mut halt = Halt::PageCap;

    for page in 1..=max_pages {
        let url = page_url(base, page)?;
        let html = match fetcher.get_html(&url).await {
            Ok(html) => html,
            Err(e) if page == 1 => return Err(e),
            Err(e) => {
                tracing::warn!(page, error = %e, "pagination degraded to partial results");
                halt = match e {
                    ScrapeError::Blocked => Halt::Blocked,
                    _ => Halt::Failed,
                };
                break;
            }
        };

        let page_records = parse(&html);
        if page_records.is_empty() {
            halt = Halt::EndOfData;
            break;
        }
        pages_with_records += 1;
        records.extend(page_records);

        if page < max_pages {
            politeness_sleep(delay_ms).await;
        }
    }

    Ok(Paged {
        records,
        pages_with_records,
        halt,
    })
}

pub(crate) fn page_url(base: &Url, page: u32) -> Result<Url> {
    if page <= 1 {
        Ok(base.clone())
    } else {
        Ok(base.join(&format!("page/{page}/"))?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fetcher::testing::MockFetcher;

    const BASE: &str = "https://letterboxd.com/alice/films/diary/";

    fn lines(html: &str) -> Vec<String> {
        html.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }

    #[tokio::test]
    async fn halts_on_first_empty_page() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .page(BASE, "a\nb")
                .page("https://letterboxd.com/alice/films/diary/page/2/", "c"),
        );
        let base = Url::parse(BASE).unwrap();

        let paged = collect(fetcher.as_ref(), &base, 10, 0, |h| lines(h))
            .await
            .unwrap();

        assert_eq!(paged.records, vec!["a", "b", "c"]);
        assert_eq!(paged.pages_with_records, 2);
        assert_eq!(paged.halt, Halt::EndOfData);
        // the empty page 3 was fetched, page 4 was not
        assert_eq!(fetcher.hits().len(), 3);
    }

    #[tokio::test]
    async fn page_cap_bounds_the_number_of_fetches() {
        let mut fetcher = MockFetcher::new();
        for page in 1..=20 {
            let url = if page == 1 {
                BASE.to_string()
            } else {
                format!("https://letterboxd.com/alice/films/diary/page/{page}/")
            };
            fetcher = fetcher.page(&url, "record");
        }
        let fetcher = Arc::new(fetcher);
        let base = Url::parse(BASE).unwrap();

        let paged = collect(fetcher.as_ref(), &base, 5, 0, |h| lines(h))
            .await
            .unwrap();

        assert_eq!(paged.records.len(), 5);
        assert_eq!(paged.halt, Halt::PageCap);
        assert_eq!(fetcher.hits().len(), 5);
    }

    #[tokio::test]
    async fn blocked_mid_run_returns_partial_results() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .page(BASE, "a")
                .page("https://letterboxd.com/alice/films/diary/page/2/", "b")
                .blocked("https://letterboxd.com/alice/films/diary/page/3/"),
        );
        let base = Url::parse(BASE).unwrap();

        let paged = collect(fetcher.as_ref(), &base, 10, 0, |h| lines(h))
            .await
            .unwrap();

        assert_eq!(paged.records, vec!["a", "b"]);
        assert_eq!(paged.halt, Halt::Blocked);
    }

    #[tokio::test]
    async fn first_page_failure_propagates() {
        let fetcher = Arc::new(MockFetcher::new().blocked(BASE));
        let base = Url::parse(BASE).unwrap();

        let err = collect(fetcher.as_ref(), &base, 10, 0, |h| lines(h))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Blocked));
    }

    #[tokio::test]
    async fn first_page_http_error_propagates_status() {
        let fetcher = Arc::new(MockFetcher::new().status(BASE, 404));
        let base = Url::parse(BASE).unwrap();

        let err = collect(fetcher.as_ref(), &base, 10, 0, |h| lines(h))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::UpstreamStatus { status: 404, .. }));
    }
}
