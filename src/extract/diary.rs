//! Diary page extraction: dated rows, the per-year header sentence, and
//! archive year discovery.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};

use crate::domain::{stars_to_rating, DiaryEntry};
use crate::extract::{attr_here_or_below, stars_text};

// The same diary is served as a table, a card list, or article blocks.
static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tr.diary-entry-row, li.diary-entry, article.diary-entry")
        .expect("valid selector")
});
static TIME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time[datetime]").expect("valid selector"));
static FILM_ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="/film/"]"#).expect("valid selector"));
static SLUG_ATTR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-film-slug]").expect("valid selector"));
static NAME_ATTR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-film-name]").expect("valid selector"));
static IMG_ALT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[alt]").expect("valid selector"));
static YEAR_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="/films/diary/for/"]"#).expect("valid selector"));

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").expect("valid regex"));
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/film/([^/]+)").expect("valid regex"));
static YEAR_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/for/(\d{4})/").expect("valid regex"));

/// Parse every diary row on a page. Rows without a resolvable watched
/// date are skipped.
pub fn parse_diary_page(html: &str) -> Vec<DiaryEntry> {
    let doc = Html::parse_document(html);
    doc.select(&ROW_SEL).filter_map(parse_row).collect()
}

fn parse_row(row: ElementRef) -> Option<DiaryEntry> {
    let date = row_date(&row)?;
    Some(DiaryEntry {
        date,
        film_slug: row_slug(&row),
        film_title: row_title(&row),
        rating: stars_text(&row).as_deref().and_then(stars_to_rating),
    })
}

fn row_date(row: &ElementRef) -> Option<NaiveDate> {
    // Preferred: explicit datetime attribute, possibly with a time suffix.
    if let Some(date) = row
        .select(&TIME_SEL)
        .next()
        .and_then(|t| t.value().attr("datetime"))
        .and_then(iso_date_prefix)
    {
        return Some(date);
    }
    // Last resort: an ISO date somewhere in the row text.
    let text: String = row.text().collect();
    ISO_DATE_RE
        .find(&text)
        .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
}

fn iso_date_prefix(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.trim().get(0..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn row_slug(row: &ElementRef) -> Option<String> {
    if let Some(slug) = attr_here_or_below(row, &SLUG_ATTR_SEL, "data-film-slug") {
        return Some(slug);
    }
    let href = row
        .select(&FILM_ANCHOR_SEL)
        .next()
        .and_then(|a| a.value().attr("href"))?;
    SLUG_RE
        .captures(href)
        .map(|caps| caps[1].to_string())
}

fn row_title(row: &ElementRef) -> Option<String> {
    if let Some(name) = attr_here_or_below(row, &NAME_ATTR_SEL, "data-film-name") {
        return Some(name.trim().to_string()).filter(|s| !s.is_empty());
    }
    if let Some(alt) = row
        .select(&IMG_ALT_SEL)
        .next()
        .and_then(|img| img.value().attr("alt"))
    {
        let alt = alt.trim();
        if !alt.is_empty() {
            return Some(alt.to_string());
        }
    }
    let text: String = row.select(&FILM_ANCHOR_SEL).next()?.text().collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Count the rows on a page whose watched date falls in `year`.
pub fn count_rows_for_year(html: &str, year: i32) -> u64 {
    use chrono::Datelike;
    parse_diary_page(html)
        .iter()
        .filter(|e| e.date.year() == year)
        .count() as u64
}

/// Find the human-readable summary sentence
/// "… has logged N entries for films during YYYY" and return N.
pub fn header_count(html: &str, year: i32) -> Option<u64> {
    let doc = Html::parse_document(html);
    let text: String = doc.root_element().text().collect();
    let pattern = format!(r"has\s+logged\s+([\d,]+)\s+entries\s+for\s+films\s+during\s+{year}");
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    let caps = re.captures(&text)?;
    caps[1].replace(',', "").parse().ok()
}

/// Discover which diary years exist from the archive page's year links,
/// sorted ascending.
pub fn diary_years(html: &str) -> Vec<i32> {
    let doc = Html::parse_document(html);
    let mut years = BTreeSet::new();
    for anchor in doc.select(&YEAR_LINK_SEL) {
        if let Some(href) = anchor.value().attr("href") {
            if let Some(caps) = YEAR_HREF_RE.captures(href) {
                if let Ok(year) = caps[1].parse::<i32>() {
                    years.insert(year);
                }
            }
        }
    }
    years.into_iter().collect()
}
