//! Pure HTML extraction against the upstream site's known layouts.
//!
//! Every public function here is total: malformed or missing markup drops
//! the affected record, never the page. Fields are resolved through
//! ordered fallback chains because the same logical page is served in
//! several renderings (table rows, poster cards, article blocks).

pub mod avatar;
pub mod diary;
pub mod film;
pub mod ratings;

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

static VIEWINGDATA_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.poster-viewingdata").expect("valid selector"));
static RATING_CLASS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"span[class*="rating"]"#).expect("valid selector"));
static RATING_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".rating").expect("valid selector"));
static DIARY_RATING_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".diary-entry-rating").expect("valid selector"));

static GLYPH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[★½]+").expect("valid regex"));

/// Extract the star-glyph run for one record element.
///
/// Tries the known rating selectors first (first matching element per
/// selector), then falls back to scanning the element's whole text.
pub(crate) fn stars_text(el: &ElementRef) -> Option<String> {
    let selectors = [
        &*VIEWINGDATA_SEL,
        &*RATING_CLASS_SEL,
        &*RATING_SEL,
        &*DIARY_RATING_SEL,
    ];
    for sel in selectors {
        if let Some(hit) = el.select(sel).next() {
            let text: String = hit.text().collect();
            if let Some(m) = GLYPH_RE.find(&text) {
                return Some(m.as_str().to_string());
            }
        }
    }
    let text: String = el.text().collect();
    GLYPH_RE.find(&text).map(|m| m.as_str().to_string())
}

/// Read an attribute from the element itself or its first descendant
/// carrying it.
pub(crate) fn attr_here_or_below(el: &ElementRef, sel: &Selector, name: &str) -> Option<String> {
    if let Some(value) = el.value().attr(name) {
        return Some(value.to_string());
    }
    el.select(sel)
        .next()
        .and_then(|hit| hit.value().attr(name))
        .map(str::to_string)
}
