use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::app::error::{Result, ScrapeError};

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]{1,30}$").expect("valid regex"));

/// A normalized upstream handle: trimmed, one leading `@` stripped,
/// lowercased, and restricted to `[a-z0-9_-]{1,30}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let stripped = trimmed.strip_prefix('@').unwrap_or(trimmed);
        let lowered = stripped.to_lowercase();
        if USERNAME_RE.is_match(&lowered) {
            Ok(Self(lowered))
        } else {
            Err(ScrapeError::InvalidUsername(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
