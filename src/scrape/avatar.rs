//! Avatar pipeline: one profile-page fetch, no pagination.

use serde::Serialize;

use crate::app::{AppContext, Result};
use crate::domain::Username;
use crate::extract;
use crate::scrape::profile_url;

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub avatar: Option<String>,
}

pub async fn fetch_avatar(ctx: &AppContext, user: &Username) -> Result<AvatarResponse> {
    let url = profile_url(&ctx.config.scrape.base_url, user)?;
    let html = ctx.fetcher.get_html(&url).await?;
    Ok(AvatarResponse {
        avatar: extract::avatar::avatar_url(&html),
    })
}
