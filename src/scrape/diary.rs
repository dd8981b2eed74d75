//! Diary year-count pipeline.
//!
//! For each year in the requested range: try the page-1 header sentence
//! first (one request), and only paginate when the header is absent or
//! smaller than what page 1 already shows. The header count is trusted
//! when it is the larger of the two; an observed count larger than the
//! header always wins.

use std::collections::BTreeMap;

use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::app::{AppContext, Result};
use crate::domain::Username;
use crate::extract::diary::{count_rows_for_year, diary_years, header_count};
use crate::scrape::paginate::page_url;
use crate::scrape::{diary_url, diary_year_url, politeness_sleep};

/// Static fallback when the archive page yields no year links.
const FALLBACK_FIRST_YEAR: i32 = 2011;

#[derive(Debug, Serialize)]
pub struct DiaryResponse {
    pub user: String,
    pub years: BTreeMap<i32, u64>,
}

pub async fn build_years(
    ctx: &AppContext,
    user: &Username,
    from: Option<i32>,
    to: Option<i32>,
) -> Result<DiaryResponse> {
    let (from, to) = resolve_year_range(ctx, user, from, to).await?;

    let mut years = BTreeMap::new();
    for year in from..=to {
        let count = match count_year(ctx, user, year).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(year, error = %e, "year count failed, recording zero");
                0
            }
        };
        years.insert(year, count);

        if year < to {
            politeness_sleep(ctx.config.scrape.year_delay_ms).await;
        }
    }

    Ok(DiaryResponse {
        user: user.to_string(),
        years,
    })
}

/// Clamp the requested bounds to the years the diary actually spans,
/// discovered from the archive page's year links.
async fn resolve_year_range(
    ctx: &AppContext,
    user: &Username,
    from: Option<i32>,
    to: Option<i32>,
) -> Result<(i32, i32)> {
    let url = diary_url(&ctx.config.scrape.base_url, user)?;
    let discovered = match ctx.fetcher.get_html(&url).await {
        Ok(html) => diary_years(&html),
        Err(e) => {
            tracing::warn!(error = %e, "diary year discovery failed, using fallback bounds");
            Vec::new()
        }
    };

    let min_year = discovered.first().copied().unwrap_or(FALLBACK_FIRST_YEAR);
    let max_year = discovered
        .last()
        .copied()
        .unwrap_or_else(|| Utc::now().year());

    let mut from = from.unwrap_or(min_year);
    let mut to = to.unwrap_or(max_year);
    if from > to {
        std::mem::swap(&mut from, &mut to);
    }

    Ok((from.clamp(min_year, max_year), to.clamp(min_year, max_year)))
}

async fn count_year(ctx: &AppContext, user: &Username, year: i32) -> Result<u64> {
    let base = diary_year_url(&ctx.config.scrape.base_url, user, year)?;
    let first = ctx.fetcher.get_html(&base).await?;

    let header = header_count(&first, year);
    let mut total = count_rows_for_year(&first, year);

    if let Some(header) = header {
        if header >= total {
            return Ok(header);
        }
        tracing::debug!(year, header, observed = total, "header count below observed rows");
    }
    if total == 0 {
        return Ok(header.unwrap_or(0));
    }

    for page in 2..=ctx.config.scrape.diary_page_cap {
        politeness_sleep(ctx.config.scrape.page_delay_ms).await;

        let url = page_url(&base, page)?;
        let html = match ctx.fetcher.get_html(&url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(year, page, error = %e, "year pagination degraded to partial count");
                break;
            }
        };
        let hits = count_rows_for_year(&html, year);
        if hits == 0 {
            break;
        }
        total += hits;
    }

    Ok(total.max(header.unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fetcher::testing::MockFetcher;
    use crate::scrape::testutil::test_context;

    const ARCHIVE: &str = "https://letterboxd.com/alice/films/diary/";

    fn year_page(dates: &[&str]) -> String {
        let rows: String = dates
            .iter()
            .map(|d| {
                format!(
                    r#"<tr class="diary-entry-row"><td><time datetime="{d}"></time></td></tr>"#
                )
            })
            .collect();
        format!("<html><body><table>{rows}</table></body></html>")
    }

    fn archive_with_years(years: &[i32]) -> String {
        let links: String = years
            .iter()
            .map(|y| format!(r#"<a href="/alice/films/diary/for/{y}/">{y}</a>"#))
            .collect();
        format!("<html><body>{links}</body></html>")
    }

    #[tokio::test]
    async fn aggregates_across_pages_and_years() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .page(ARCHIVE, archive_with_years(&[2023, 2024]))
                .page(
                    "https://letterboxd.com/alice/films/diary/for/2023/",
                    year_page(&["2023-05-01", "2023-06-02", "2023-07-03"]),
                )
                .page(
                    "https://letterboxd.com/alice/films/diary/for/2023/page/2/",
                    year_page(&["2023-08-04", "2023-09-05"]),
                )
                .page(
                    "https://letterboxd.com/alice/films/diary/for/2024/",
                    year_page(&["2024-01-10", "2024-02-11", "2024-03-12"]),
                ),
        );
        let ctx = test_context(fetcher);
        let user = Username::parse("alice").unwrap();

        let response = build_years(&ctx, &user, None, None).await.unwrap();
        assert_eq!(response.years.get(&2023), Some(&5));
        assert_eq!(response.years.get(&2024), Some(&3));
    }

    #[tokio::test]
    async fn header_count_wins_when_larger() {
        let html = format!(
            "<html><body><p>Alice has logged 10 entries for films during 2024.</p>\
             {}</body></html>",
            year_page(&[
                "2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04",
                "2024-01-05", "2024-01-06", "2024-01-07", "2024-01-08",
            ])
        );
        let fetcher = Arc::new(
            MockFetcher::new()
                .page(ARCHIVE, archive_with_years(&[2024]))
                .page("https://letterboxd.com/alice/films/diary/for/2024/", html),
        );
        let fetcher_ref = fetcher.clone();
        let ctx = test_context(fetcher);
        let user = Username::parse("alice").unwrap();

        let response = build_years(&ctx, &user, Some(2024), Some(2024)).await.unwrap();
        assert_eq!(response.years.get(&2024), Some(&10));
        // the header short-circuits pagination
        assert_eq!(
            fetcher_ref.hit_count("https://letterboxd.com/alice/films/diary/for/2024/page/2/"),
            0
        );
    }

    #[tokio::test]
    async fn larger_observed_count_overrides_a_stale_header() {
        let page1 = format!(
            "<html><body><p>Alice has logged 2 entries for films during 2024.</p>\
             {}</body></html>",
            year_page(&["2024-01-01", "2024-01-02", "2024-01-03"])
        );
        let fetcher = Arc::new(
            MockFetcher::new()
                .page(ARCHIVE, archive_with_years(&[2024]))
                .page("https://letterboxd.com/alice/films/diary/for/2024/", page1)
                .page(
                    "https://letterboxd.com/alice/films/diary/for/2024/page/2/",
                    year_page(&["2024-02-01"]),
                ),
        );
        let ctx = test_context(fetcher);
        let user = Username::parse("alice").unwrap();

        let response = build_years(&ctx, &user, Some(2024), Some(2024)).await.unwrap();
        assert_eq!(response.years.get(&2024), Some(&4));
    }

    #[tokio::test]
    async fn blocked_year_records_zero_and_continues() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .page(ARCHIVE, archive_with_years(&[2023, 2024]))
                .blocked("https://letterboxd.com/alice/films/diary/for/2023/")
                .page(
                    "https://letterboxd.com/alice/films/diary/for/2024/",
                    year_page(&["2024-01-10"]),
                ),
        );
        let ctx = test_context(fetcher);
        let user = Username::parse("alice").unwrap();

        let response = build_years(&ctx, &user, None, None).await.unwrap();
        assert_eq!(response.years.get(&2023), Some(&0));
        assert_eq!(response.years.get(&2024), Some(&1));
    }

    #[tokio::test]
    async fn swaps_and_clamps_the_requested_range() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .page(ARCHIVE, archive_with_years(&[2022, 2023]))
                .page(
                    "https://letterboxd.com/alice/films/diary/for/2022/",
                    year_page(&["2022-03-03"]),
                )
                .page(
                    "https://letterboxd.com/alice/films/diary/for/2023/",
                    year_page(&["2023-04-04"]),
                ),
        );
        let ctx = test_context(fetcher);
        let user = Username::parse("alice").unwrap();

        // reversed and out-of-span bounds collapse to the discovered span
        let response = build_years(&ctx, &user, Some(2030), Some(1999)).await.unwrap();
        let years: Vec<i32> = response.years.keys().copied().collect();
        assert_eq!(years, vec![2022, 2023]);
    }
}
