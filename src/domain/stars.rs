//! Star-glyph rating decoding.
//!
//! Ratings are rendered upstream as a run of `★` glyphs plus an optional
//! trailing `½`. Valid values are the half-star steps 0.5 through 5.0.

/// The fixed bin axis used by the histogram endpoint.
pub const STAR_BINS: [f64; 10] = [0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0];

/// Decode a glyph run like `★★★½` into a rating. Only the valid half-star
/// steps 0.5 through 5.0 decode; an empty run or an over-full run (seen in
/// free review text) yields `None`.
pub fn stars_to_rating(text: &str) -> Option<f64> {
    let full = text.chars().filter(|&c| c == '★').count();
    let half = if text.contains('½') { 0.5 } else { 0.0 };
    let value = full as f64 + half;
    (value > 0.0 && value <= 5.0).then_some(value)
}

/// Index of the bin in [`STAR_BINS`] for a rating, rounded to the nearest
/// half star. Out-of-range ratings yield `None`.
pub fn bin_index(rating: f64) -> Option<usize> {
    let halves = (rating * 2.0).round() as i64;
    (1..=10).contains(&halves).then(|| halves as usize - 1)
}
