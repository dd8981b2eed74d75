//! One handler per endpoint: parse the query, clamp page bounds, run the
//! matching scrape pipeline, and attach the endpoint's cache policy.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::app::AppContext;
use crate::domain::Username;
use crate::scrape;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DiaryQuery {
    pub user: Option<String>,
    pub from: Option<i32>,
    pub to: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedQuery {
    pub user: Option<String>,
    pub max_pages: Option<u32>,
}

fn require_user(user: Option<&str>) -> Result<Username, ApiError> {
    let raw = user.ok_or_else(|| ApiError::BadRequest("missing user parameter".into()))?;
    Ok(Username::parse(raw)?)
}

pub async fn avatar(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(query.user.as_deref())?;
    let body = scrape::avatar::fetch_avatar(&ctx, &user).await?;
    Ok((
        [(
            header::CACHE_CONTROL,
            "public, max-age=86400, stale-while-revalidate=86400",
        )],
        Json(body),
    ))
}

pub async fn diary(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<DiaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(query.user.as_deref())?;
    let body = scrape::diary::build_years(&ctx, &user, query.from, query.to).await?;
    Ok(([(header::CACHE_CONTROL, "no-store")], Json(body)))
}

pub async fn ratings(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<PagedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(query.user.as_deref())?;
    let max_pages = query
        .max_pages
        .unwrap_or(ctx.config.scrape.ratings_default_pages)
        .clamp(1, ctx.config.scrape.ratings_page_cap);
    let body = scrape::ratings::build_ratings(&ctx, &user, max_pages).await?;
    Ok(([(header::CACHE_CONTROL, "no-store")], Json(body)))
}

pub async fn ratings_timeline(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<PagedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(query.user.as_deref())?;
    let max_pages = query
        .max_pages
        .unwrap_or(ctx.config.scrape.timeline_page_cap)
        .clamp(1, ctx.config.scrape.timeline_page_cap);
    let body = scrape::timeline::build_timeline(&ctx, &user, max_pages).await?;
    Ok(([(header::CACHE_CONTROL, "public, max-age=900")], Json(body)))
}

pub async fn watchtime(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<PagedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(query.user.as_deref())?;
    let max_pages = query
        .max_pages
        .unwrap_or(ctx.config.scrape.watchtime_page_cap)
        .clamp(1, ctx.config.scrape.watchtime_page_cap);
    let body = scrape::watchtime::build_watchtime(&ctx, &user, max_pages).await?;
    Ok(([(header::CACHE_CONTROL, "public, max-age=1800")], Json(body)))
}
