use anyhow::{Context, Result};
use reqwest::Url;
use std::time::Duration;

/// Runtime configuration loaded from environment variables.
///
/// | Env Var                          | Default                  |
/// |----------------------------------|--------------------------|
/// | `LISTINGS_API_BASE_URL`          | `http://127.0.0.1:8000/` |
/// | `LISTINGS_REQUEST_TIMEOUT_SECS`  | `30`                     |
/// | `LISTINGS_DEBOUNCE_MS`           | `250`                    |
/// | `LISTINGS_MIN_QUERY_LEN`         | `3`                      |
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Origin serving `/api/...`; always ends with `/`.
    pub api_base_url: Url,
    pub request_timeout: Duration,
    /// Quiet period before an autocomplete request fires.
    pub debounce: Duration,
    /// Shortest trimmed query that is sent to the autocomplete endpoint.
    pub min_query_len: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base url is valid"),
            request_timeout: Duration::from_secs(30),
            debounce: Duration::from_millis(250),
            min_query_len: 3,
        }
    }
}

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/";

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("LISTINGS_API_BASE_URL") {
            config.api_base_url = parse_base_url(&raw)?;
        }

        if let Some(raw) = lookup("LISTINGS_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .context("LISTINGS_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("LISTINGS_DEBOUNCE_MS") {
            let ms: u64 = raw
                .trim()
                .parse()
                .context("LISTINGS_DEBOUNCE_MS must be a whole number of milliseconds")?;
            config.debounce = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("LISTINGS_MIN_QUERY_LEN") {
            config.min_query_len = raw
                .trim()
                .parse()
                .context("LISTINGS_MIN_QUERY_LEN must be a non-negative integer")?;
        }

        Ok(config)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).with_context(|| format!("LISTINGS_API_BASE_URL is not a valid URL: {raw}"))
}
