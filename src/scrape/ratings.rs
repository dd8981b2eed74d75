//! Ratings-list pipeline: flat list of rated films in page order.

use serde::Serialize;

use crate::app::{AppContext, Result};
use crate::domain::{RatingItem, Username};
use crate::extract::ratings::parse_ratings_page;
use crate::scrape::{paginate, ratings_url};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsResponse {
    pub user: String,
    pub count: usize,
    pub pages_scanned: u32,
    pub items: Vec<RatingItem>,
}

pub async fn build_ratings(
    ctx: &AppContext,
    user: &Username,
    max_pages: u32,
) -> Result<RatingsResponse> {
    let base = ratings_url(&ctx.config.scrape.base_url, user)?;
    let site = ctx.config.scrape.base_url.clone();

    let paged = paginate::collect(
        ctx.fetcher.as_ref(),
        &base,
        max_pages,
        ctx.config.scrape.page_delay_ms,
        |html| parse_ratings_page(html, &site),
    )
    .await?;

    Ok(RatingsResponse {
        user: user.to_string(),
        count: paged.records.len(),
        pages_scanned: paged.pages_with_records,
        items: paged.records,
    })
}
