//! Watch-time pipeline: diary log count times per-film runtime.
//!
//! Rewatches count every diary row, but each distinct film page is
//! fetched only once; its runtime is multiplied by the number of logs.

use std::collections::HashMap;

use serde::Serialize;

use crate::app::{AppContext, Result};
use crate::domain::Username;
use crate::extract::diary::parse_diary_page;
use crate::extract::film::runtime_minutes;
use crate::scrape::{diary_url, film_url, paginate};

#[derive(Debug, Serialize)]
pub struct WatchtimeResponse {
    pub user: String,
    /// Film logs seen, rewatches included. Rows without a resolvable film
    /// link contribute nothing, to runtime or to this count.
    pub logs: u64,
    pub minutes: u64,
    /// Minutes over 60, rounded to two decimals.
    pub hours: f64,
}

pub async fn build_watchtime(
    ctx: &AppContext,
    user: &Username,
    max_pages: u32,
) -> Result<WatchtimeResponse> {
    let base = diary_url(&ctx.config.scrape.base_url, user)?;

    let paged = paginate::collect(
        ctx.fetcher.as_ref(),
        &base,
        max_pages,
        ctx.config.scrape.page_delay_ms,
        parse_diary_page,
    )
    .await?;

    let mut log_counts: HashMap<String, u64> = HashMap::new();
    for entry in paged.records {
        if let Some(slug) = entry.film_slug {
            *log_counts.entry(slug).or_insert(0) += 1;
        } else {
            tracing::debug!("diary row without a film slug skipped");
        }
    }
    let logs: u64 = log_counts.values().sum();

    let mut targets = Vec::with_capacity(log_counts.len());
    for slug in log_counts.keys() {
        targets.push((slug.clone(), film_url(&ctx.config.scrape.base_url, slug)?));
    }

    let mut minutes = 0u64;
    for (slug, fetched) in ctx.parallel.fetch_all(targets).await {
        let runtime = match fetched {
            Ok(html) => runtime_minutes(&html).unwrap_or(0),
            Err(e) => {
                tracing::warn!(slug = %slug, error = %e, "film page failed, runtime counted as zero");
                0
            }
        };
        minutes += u64::from(runtime) * log_counts.get(&slug).copied().unwrap_or(0);
    }

    Ok(WatchtimeResponse {
        user: user.to_string(),
        logs,
        minutes,
        hours: (minutes as f64 / 60.0 * 100.0).round() / 100.0,
    })
}
