//! # boxdstats
//!
//! A best-effort scraping service that aggregates a Letterboxd user's
//! public pages (diary, ratings, profile, film details) into JSON
//! summaries.
//!
//! ## Architecture
//!
//! Every endpoint is the same pipeline with a different extractor and fold:
//!
//! ```text
//! Paginator → Fetcher → Extractor → Aggregator → JSON handler
//! ```
//!
//! - [`fetcher`]: HTTP client with anti-bot detection and bounded retry
//! - [`extract`]: per-page-type HTML extraction with layout fallback chains
//! - [`scrape`]: sequential pagination and the per-endpoint pipelines
//! - [`api`]: thin axum adapter exposing the pipelines as GET endpoints
//!
//! The upstream site is an unversioned, uncontracted HTML source: any
//! markup change can silently degrade extraction, so every field is pulled
//! through an ordered list of strategies and a failed record is skipped
//! rather than failing the page.

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires together configuration, the shared
/// [`Fetcher`](fetcher::Fetcher) and the bounded-concurrency
/// [`ParallelFetcher`](fetcher::parallel::ParallelFetcher).
pub mod app;

/// HTTP surface: router, handlers, error-to-status mapping.
pub mod api;

/// Environment-sourced configuration with defaults.
pub mod config;

/// Core domain models: usernames, diary entries, rating items, histogram
/// frames, star-glyph decoding.
pub mod domain;

/// Pure HTML extraction, one module per upstream page type.
///
/// Extraction never errors: a missing required field drops that single
/// record. Each strategy in a fallback chain is independently testable
/// against a fixture snippet.
pub mod extract;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for page fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based
///   implementation with UA rotation and block-retry
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): semaphore-gated
///   fan-out for film runtime lookups
pub mod fetcher;

/// Pagination and the per-endpoint scrape pipelines.
pub mod scrape;
