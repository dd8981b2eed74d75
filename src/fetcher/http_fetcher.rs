use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use regex::Regex;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, COOKIE, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use url::Url;

use crate::app::{Result, ScrapeError};
use crate::config::ScrapeConfig;
use crate::fetcher::Fetcher;

/// Small fixed pool of browser identities, picked per request to reduce
/// fingerprinting.
const UA_POOL: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123 Safari/537.36",
];

/// Phrases found on anti-bot interstitial pages instead of real content.
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(just a moment|attention required|cloudflare|please enable cookies|checking your browser)",
    )
    .expect("valid regex")
});

const RETRY_BASE_MS: u64 = 800;
const RETRY_STEP_MS: u64 = 400;
const RETRY_JITTER_MS: u64 = 400;

pub(crate) fn is_blocked(html: &str) -> bool {
    BLOCK_RE.is_match(html)
}

pub struct HttpFetcher {
    client: Client,
    session_cookie: Option<String>,
    retries: u32,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            session_cookie: config.session_cookie.clone(),
            retries: config.retries,
        })
    }

    fn request(&self, url: &Url) -> RequestBuilder {
        let ua = UA_POOL[rand::rng().random_range(0..UA_POOL.len())];
        let mut builder = self
            .client
            .get(url.as_str())
            .header(USER_AGENT, ua)
            .header(ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.8")
            .header(CACHE_CONTROL, "no-cache");
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder
    }

    fn backoff(attempt: u32) -> Duration {
        let jitter = rand::rng().random_range(0..RETRY_JITTER_MS);
        Duration::from_millis(RETRY_BASE_MS + RETRY_STEP_MS * u64::from(attempt) + jitter)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_html(&self, url: &Url) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            let response = self.request(url).send().await?;
            let status = response.status();
            let body = response.text().await?;

            if is_blocked(&body) {
                if attempt >= self.retries {
                    return Err(ScrapeError::Blocked);
                }
                let delay = Self::backoff(attempt);
                tracing::warn!(%url, attempt, ?delay, "block page detected, backing off");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                return Err(ScrapeError::UpstreamStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            return Ok(body);
        }
    }
}
