//! Per-endpoint scrape pipelines over a shared sequential paginator.
//!
//! Each pipeline is fetch → extract → aggregate for one endpoint, driven
//! through the injected [`Fetcher`](crate::fetcher::Fetcher) so tests can
//! substitute canned pages.

pub mod avatar;
pub mod diary;
pub mod paginate;
pub mod ratings;
pub mod timeline;
pub mod watchtime;

use std::time::Duration;

use rand::Rng;
use url::Url;

use crate::app::Result;
use crate::domain::Username;

/// Rate-limit avoidance between successive upstream fetches: sleeps the
/// base delay plus up to the same amount of jitter. A zero base is a
/// no-op (used by tests).
pub(crate) async fn politeness_sleep(base_ms: u64) {
    if base_ms == 0 {
        return;
    }
    let jitter = rand::rng().random_range(0..=base_ms);
    tokio::time::sleep(Duration::from_millis(base_ms + jitter)).await;
}

pub(crate) fn profile_url(base: &Url, user: &Username) -> Result<Url> {
    Ok(base.join(&format!("/{user}/"))?)
}

pub(crate) fn diary_url(base: &Url, user: &Username) -> Result<Url> {
    Ok(base.join(&format!("/{user}/films/diary/"))?)
}

pub(crate) fn diary_year_url(base: &Url, user: &Username, year: i32) -> Result<Url> {
    Ok(base.join(&format!("/{user}/films/diary/for/{year}/"))?)
}

pub(crate) fn ratings_url(base: &Url, user: &Username) -> Result<Url> {
    Ok(base.join(&format!("/{user}/films/ratings/"))?)
}

pub(crate) fn film_url(base: &Url, slug: &str) -> Result<Url> {
    Ok(base.join(&format!("/film/{slug}/"))?)
}
