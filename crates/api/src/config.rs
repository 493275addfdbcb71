use std::env;
use std::fmt;

use anyhow::{Context, Result, bail};
use subtle::ConstantTimeEq;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM_BASE_URL: &str = "https://www.linkedin.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub api_key: Secret,
    pub upstream: UpstreamConfig,
}

/// Session and endpoint settings for the Voyager API.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub cookie: Secret,
    pub csrf_token: Secret,
    pub timeout_secs: u64,
    pub posts_query_id: String,
    pub people_query_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    Pretty, // Human-readable, default
    Json,   // One JSON object per line
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// A credential that never shows up in `Debug` output.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against caller-supplied bytes.
    pub fn matches(&self, candidate: &[u8]) -> bool {
        self.0.as_bytes().ct_eq(candidate).into()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key/value source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match get("PORT") {
            Some(port) => port.parse().with_context(|| format!("Invalid PORT: {port}"))?,
            None => DEFAULT_PORT,
        };

        let api_key = get("API_KEY").context("API_KEY must be set")?;
        let cookie = get("COOKIE_STRING").context("COOKIE_STRING must be set")?;
        // GraphQL query ids rotate with upstream deployments.
        let posts_query_id = get("POSTS_QUERY_ID").context("POSTS_QUERY_ID must be set")?;
        let people_query_id = get("PEOPLE_QUERY_ID").context("PEOPLE_QUERY_ID must be set")?;

        let csrf_token = match get("CSRF_TOKEN") {
            Some(token) => token,
            None => csrf_from_cookie(&cookie)
                .context("CSRF_TOKEN is unset and COOKIE_STRING has no JSESSIONID")?,
        };

        let timeout_secs = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(secs) => secs
                .parse()
                .with_context(|| format!("Invalid UPSTREAM_TIMEOUT_SECS: {secs}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }

        let base_url = get("UPSTREAM_BASE_URL")
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            port,
            api_key: Secret::new(api_key),
            upstream: UpstreamConfig {
                base_url,
                cookie: Secret::new(cookie),
                csrf_token: Secret::new(csrf_token),
                timeout_secs,
                posts_query_id,
                people_query_id,
            },
        })
    }
}

/// The CSRF header must echo the session's `JSESSIONID` cookie value.
pub fn csrf_from_cookie(cookie: &str) -> Option<String> {
    cookie
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "JSESSIONID")
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
