//! Film detail page extraction: runtime sniffing.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

static DURATION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[itemprop="duration"]"#).expect("valid selector"));
static META_DURATION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[itemprop="duration"]"#).expect("valid selector"));
static VIDEO_DURATION_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="video:duration"]"#).expect("valid selector")
});

// e.g. PT2H14M, PT95M
static ISO_DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^PT(?:(\d+)H)?(?:(\d+)M)?$").expect("valid regex"));
static MINS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:mins?|minutes)\b").expect("valid regex"));
static HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*h(?:\s*(\d+)\s*m)?").expect("valid regex"));

/// Best-effort runtime in minutes for a film detail page.
///
/// Prefers the schema.org duration markup, then falls back to the text
/// patterns the site renders ("134 mins", "2h 14m").
pub fn runtime_minutes(html: &str) -> Option<u32> {
    let doc = Html::parse_document(html);

    for sel in [&*DURATION_SEL, &*META_DURATION_SEL, &*VIDEO_DURATION_SEL] {
        if let Some(content) = doc
            .select(sel)
            .next()
            .and_then(|el| el.value().attr("content"))
        {
            if let Some(minutes) = iso_duration_minutes(content) {
                return Some(minutes);
            }
        }
    }

    let text: String = doc.root_element().text().collect();
    if let Some(caps) = MINS_RE.captures(&text) {
        return caps[1].parse().ok();
    }
    if let Some(caps) = HOURS_RE.captures(&text) {
        let hours: u32 = caps[1].parse().ok()?;
        let minutes: u32 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        return Some(hours * 60 + minutes);
    }

    None
}

fn iso_duration_minutes(raw: &str) -> Option<u32> {
    let caps = ISO_DURATION_RE.captures(raw.trim())?;
    let hours: u32 = caps.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    let minutes: u32 = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    Some(hours * 60 + minutes)
}
