//! Ratings list extraction: one [`RatingItem`] per rated tile.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::{stars_to_rating, RatingItem};
use crate::extract::{attr_here_or_below, stars_text};

static LI_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("valid selector"));
static NAME_ATTR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-film-name]").expect("valid selector"));
static IMG_ALT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[alt]").expect("valid selector"));
static SLUG_ATTR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-film-slug]").expect("valid selector"));
static FILM_ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="/film/"]"#).expect("valid selector"));
static TARGET_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[data-target-link*="/film/"]"#).expect("valid selector"));
static FILM_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[data-film-link*="/film/"]"#).expect("valid selector"));
static YEAR_ATTR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-film-year]").expect("valid selector"));
static RELEASE_YEAR_ATTR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-film-release-year]").expect("valid selector"));
static YEAR_TEXT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".year, .metadata, small").expect("valid selector"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/film/([^/]+)").expect("valid regex"));
static FOUR_DIGIT_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid regex"));
static TEXT_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("valid regex"));
static SLUG_SUFFIX_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d{4})$").expect("valid regex"));

/// Parse every rated tile on a ratings page. Tiles without a title or a
/// decodable star rating are dropped; nothing is deduplicated.
pub fn parse_ratings_page(html: &str, site: &Url) -> Vec<RatingItem> {
    let doc = Html::parse_document(html);
    let mut items = Vec::new();

    for tile in doc.select(&LI_SEL) {
        let Some(title) = tile_title(&tile) else {
            continue;
        };
        let Some(text) = stars_text(&tile) else {
            continue;
        };
        let Some(rating) = stars_to_rating(&text) else {
            continue;
        };

        let slug = tile_slug(&tile);
        let year = tile_year(&tile, slug.as_deref());
        // Canonical film URL, not the per-user diary URL.
        let url = slug
            .as_deref()
            .and_then(|s| site.join(&format!("/film/{s}/")).ok())
            .map(String::from);

        items.push(RatingItem {
            title,
            stars_text: text,
            rating,
            slug,
            url,
            year,
        });
    }

    items
}

fn tile_title(tile: &ElementRef) -> Option<String> {
    let name = attr_here_or_below(tile, &NAME_ATTR_SEL, "data-film-name").or_else(|| {
        tile.select(&IMG_ALT_SEL)
            .next()
            .and_then(|img| img.value().attr("alt"))
            .map(str::to_string)
    })?;
    let name = name.trim().to_string();
    (!name.is_empty()).then_some(name)
}

fn tile_slug(tile: &ElementRef) -> Option<String> {
    // a) explicit data attribute
    if let Some(slug) = attr_here_or_below(tile, &SLUG_ATTR_SEL, "data-film-slug") {
        return Some(slug);
    }
    // b) anchor href
    if let Some(href) = tile
        .select(&FILM_ANCHOR_SEL)
        .next()
        .and_then(|a| a.value().attr("href"))
    {
        if let Some(caps) = SLUG_RE.captures(href) {
            return Some(caps[1].to_string());
        }
    }
    // c) other attributes some layouts use
    let link = attr_here_or_below(tile, &TARGET_LINK_SEL, "data-target-link")
        .or_else(|| attr_here_or_below(tile, &FILM_LINK_SEL, "data-film-link"))?;
    SLUG_RE.captures(&link).map(|caps| caps[1].to_string())
}

fn tile_year(tile: &ElementRef, slug: Option<&str>) -> Option<i32> {
    // from attributes
    let attr_year = attr_here_or_below(tile, &YEAR_ATTR_SEL, "data-film-year").or_else(|| {
        attr_here_or_below(tile, &RELEASE_YEAR_ATTR_SEL, "data-film-release-year")
    });
    if let Some(raw) = attr_year {
        if FOUR_DIGIT_YEAR_RE.is_match(&raw) {
            return raw.parse().ok();
        }
    }

    // from nearby text
    if let Some(el) = tile.select(&YEAR_TEXT_SEL).next() {
        let text: String = el.text().collect();
        if let Some(m) = TEXT_YEAR_RE.find(&text) {
            return m.as_str().parse().ok();
        }
    }

    // from the slug suffix, e.g. "weapons-2025"
    let slug = slug?;
    SLUG_SUFFIX_YEAR_RE
        .captures(slug)
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Url {
        Url::parse("https://letterboxd.com").unwrap()
    }

    const PAGE: &str = r#"<html><body><ul>
      <li data-film-slug="weapons-2025" data-film-name="Weapons">
        <p class="poster-viewingdata">★★★★</p>
      </li>
      <li>
        <img alt="The Zone of Interest"/>
        <a href="/film/the-zone-of-interest/"></a>
        <small>2023</small>
        <span class="rating">★★★½</span>
      </li>
      <li>
        <div data-film-name="Unrated Film"></div>
        <a href="/film/unrated-film/"></a>
      </li>
      <li>
        <span class="rating">★★★</span>
      </li>
    </ul></body></html>"#;

    #[test]
    fn resolves_fields_through_fallback_chains() {
        let items = parse_ratings_page(PAGE, &site());
        assert_eq!(items.len(), 2);

        // title + slug from data attributes, year from slug suffix
        assert_eq!(items[0].title, "Weapons");
        assert_eq!(items[0].slug.as_deref(), Some("weapons-2025"));
        assert_eq!(items[0].year, Some(2025));
        assert_eq!(items[0].rating, 4.0);
        assert_eq!(items[0].stars_text, "★★★★");
        assert_eq!(
            items[0].url.as_deref(),
            Some("https://letterboxd.com/film/weapons-2025/")
        );

        // title from img alt, slug from href, year from nearby text
        assert_eq!(items[1].title, "The Zone of Interest");
        assert_eq!(items[1].slug.as_deref(), Some("the-zone-of-interest"));
        assert_eq!(items[1].year, Some(2023));
        assert_eq!(items[1].rating, 3.5);
    }

    #[test]
    fn drops_unrated_and_untitled_tiles() {
        let items = parse_ratings_page(PAGE, &site());
        assert!(items.iter().all(|i| i.title != "Unrated Film"));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn duplicate_titles_are_kept() {
        let html = r#"<ul>
          <li data-film-name="Nosferatu" data-film-slug="nosferatu">
            <span class="rating">★★★★</span></li>
          <li data-film-name="Nosferatu" data-film-slug="nosferatu-2024">
            <span class="rating">★★★</span></li>
        </ul>"#;
        let items = parse_ratings_page(html, &site());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, items[1].title);
        assert_ne!(items[0].slug, items[1].slug);
    }

    #[test]
    fn drops_tiles_with_over_full_glyph_runs() {
        // six stars can only come from user-authored text, never a rating
        let html = r#"<ul><li data-film-name="Hype" data-film-slug="hype">
          <em>★★★★★★ best film ever</em>
        </li></ul>"#;
        assert!(parse_ratings_page(html, &site()).is_empty());
    }

    #[test]
    fn slug_from_alternate_link_attributes() {
        let html = r#"<ul><li data-film-name="Oldboy">
          <div data-target-link="/film/oldboy/"></div>
          <span class="rating">★★★★½</span>
        </li></ul>"#;
        let items = parse_ratings_page(html, &site());
        assert_eq!(items[0].slug.as_deref(), Some("oldboy"));
        assert_eq!(items[0].rating, 4.5);
    }
}
