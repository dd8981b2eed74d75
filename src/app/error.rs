use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("blocked by upstream anti-bot challenge")]
    Blocked,

    #[error("upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid username: {0:?}")]
    InvalidUsername(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
