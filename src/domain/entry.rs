use chrono::NaiveDate;
use serde::Serialize;

/// One logged viewing event parsed from a diary row.
///
/// Only the watched date is required; slug, title and rating depend on
/// which layout the page used and which fields survived extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryEntry {
    pub date: NaiveDate,
    pub film_slug: Option<String>,
    pub film_title: Option<String>,
    pub rating: Option<f64>,
}

/// One tile from the ratings list. Never deduplicated: the same title may
/// appear twice (distinct films, or repeat listings).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingItem {
    pub title: String,
    pub stars_text: String,
    pub rating: f64,
    pub slug: Option<String>,
    pub url: Option<String>,
    pub year: Option<i32>,
}

/// One frame of the cumulative rating histogram, aligned to
/// [`STAR_BINS`](crate::domain::STAR_BINS). Each frame is the previous
/// frame with exactly one bin incremented.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramFrame {
    pub date_time: NaiveDate,
    pub rating: f64,
    pub counts: Vec<u32>,
}
