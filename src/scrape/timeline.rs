//! Ratings-timeline pipeline: cumulative histogram frames over the diary.

use serde::Serialize;

use crate::app::{AppContext, Result};
use crate::domain::{bin_index, DiaryEntry, HistogramFrame, Username, STAR_BINS};
use crate::extract::diary::parse_diary_page;
use crate::scrape::{diary_url, paginate};

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub user: String,
    pub bins: Vec<f64>,
    pub frames: Vec<HistogramFrame>,
}

pub async fn build_timeline(
    ctx: &AppContext,
    user: &Username,
    max_pages: u32,
) -> Result<TimelineResponse> {
    let base = diary_url(&ctx.config.scrape.base_url, user)?;

    let paged = paginate::collect(
        ctx.fetcher.as_ref(),
        &base,
        max_pages,
        ctx.config.scrape.page_delay_ms,
        |html| {
            parse_diary_page(html)
                .into_iter()
                .filter(|entry| entry.rating.is_some())
                .collect::<Vec<_>>()
        },
    )
    .await?;

    let mut entries = paged.records;
    // Page order is newest-first; frames must run oldest to newest.
    // Stable sort keeps document order within a day.
    entries.sort_by_key(|entry| entry.date);

    Ok(TimelineResponse {
        user: user.to_string(),
        bins: STAR_BINS.to_vec(),
        frames: cumulative_frames(&entries),
    })
}

/// Fold sorted entries into cumulative frames: each frame is the previous
/// frame's bin vector with exactly one bin incremented.
fn cumulative_frames(entries: &[DiaryEntry]) -> Vec<HistogramFrame> {
    let mut counts = vec![0u32; STAR_BINS.len()];
    let mut frames = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(rating) = entry.rating else { continue };
        let Some(index) = bin_index(rating) else { continue };
        counts[index] += 1;

        frames.push(HistogramFrame {
            date_time: entry.date,
            rating,
            counts: counts.clone(),
        });
    }

    frames
}
