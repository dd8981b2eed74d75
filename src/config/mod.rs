//! Configuration, sourced from environment variables with defaults.
//!
//! | Env Var             | Default                   |
//! |---------------------|---------------------------|
//! | `HOST`              | `0.0.0.0`                 |
//! | `PORT`              | `3000`                    |
//! | `UPSTREAM_BASE_URL` | `https://letterboxd.com`  |
//! | `LB_COOKIE`         | unset                     |

use std::time::Duration;

use url::Url;

use crate::app::error::{Result, ScrapeError};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub scrape: ScrapeConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            scrape: ScrapeConfig::from_env()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .map_err(|_| ScrapeError::Config("PORT must be a valid u16".into()))?;
        Ok(Self { host, port })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

/// Scrape tuning knobs shared by all pipelines.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Base URL of the upstream site.
    pub base_url: Url,

    /// Optional session cookie sent with every upstream request.
    pub session_cookie: Option<String>,

    /// Retries per fetch when a block page is detected (default: 3).
    pub retries: u32,

    /// Per-request timeout in seconds (default: 10).
    pub timeout_secs: u64,

    /// Base politeness delay between page fetches in milliseconds,
    /// jittered up to 2x (default: 300).
    pub page_delay_ms: u64,

    /// Base delay between per-year diary scans in milliseconds (default: 150).
    pub year_delay_ms: u64,

    /// Concurrent film-runtime lookups (default: 10).
    pub workers: usize,

    /// Page cap for per-year diary counting (default: 60).
    pub diary_page_cap: u32,

    /// Page cap for the ratings timeline (default: 80).
    pub timeline_page_cap: u32,

    /// Hard page cap for the ratings list (default: 200).
    pub ratings_page_cap: u32,

    /// Ratings list pages scanned when `maxPages` is absent (default: 50).
    pub ratings_default_pages: u32,

    /// Page cap for watch-time diary collection (default: 200).
    pub watchtime_page_cap: u32,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://letterboxd.com").expect("valid base URL"),
            session_cookie: None,
            retries: 3,
            timeout_secs: 10,
            page_delay_ms: 300,
            year_delay_ms: 150,
            workers: 10,
            diary_page_cap: 60,
            timeline_page_cap: 80,
            ratings_page_cap: 200,
            ratings_default_pages: 50,
            watchtime_page_cap: 200,
        }
    }
}

impl ScrapeConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("UPSTREAM_BASE_URL") {
            config.base_url = Url::parse(&raw)?;
        }
        config.session_cookie = std::env::var("LB_COOKIE").ok().filter(|c| !c.is_empty());

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
