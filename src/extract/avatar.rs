//! Profile page extraction: avatar image URL.

use std::sync::LazyLock;

use scraper::{Html, Selector};

static AVATAR_LARGE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#avatar-large").expect("valid selector"));
static AVATAR_IMG_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img.avatar").expect("valid selector"));
static OG_IMAGE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).expect("valid selector"));

/// Extract the avatar URL from a profile page, absolutizing
/// protocol-relative sources.
pub fn avatar_url(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    let src = doc
        .select(&AVATAR_LARGE_SEL)
        .next()
        .and_then(|el| el.value().attr("src"))
        .or_else(|| {
            doc.select(&AVATAR_IMG_SEL)
                .next()
                .and_then(|el| el.value().attr("src"))
        })
        .or_else(|| {
            doc.select(&OG_IMAGE_SEL)
                .next()
                .and_then(|el| el.value().attr("content"))
        })?;

    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    Some(match src.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => src.to_string(),
    })
}
