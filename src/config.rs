use std::time::Duration;

use anyhow::Context;

use crate::tmdb_client::DEFAULT_TMDB_BASE_URL;

#[derive(Debug)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub db_connection_string: String,
    pub bind_addr: String,
    /// Cached entries older than this are refetched. `None` keeps them forever.
    pub cache_max_age: Option<Duration>,
    pub tmdb_timeout: Option<Duration>,
}

const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://cinemus.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let tmdb_api_key = std::env::var("MOVIE_DB_API_KEY").unwrap_or_default();
        let tmdb_base_url = std::env::var("TMDB_BASE_URL").unwrap_or(DEFAULT_TMDB_BASE_URL.into());
        let db_connection_string =
            std::env::var("DB_CONNECTION_STRING").unwrap_or(DEFAULT_DB_CONNECTION_STRING.into());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.into());
        let cache_max_age = parse_secs(std::env::var("CACHE_MAX_AGE_SECS").ok().as_deref())
            .context("Invalid CACHE_MAX_AGE_SECS")?;
        let tmdb_timeout = parse_secs(std::env::var("TMDB_TIMEOUT_SECS").ok().as_deref())
            .context("Invalid TMDB_TIMEOUT_SECS")?;
        Ok(Config {
            tmdb_api_key,
            tmdb_base_url,
            db_connection_string,
            bind_addr,
            cache_max_age,
            tmdb_timeout,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.tmdb_api_key.is_empty() {
            return Err("MOVIE_DB_API_KEY is missing".into());
        }
        if self.tmdb_base_url.is_empty() {
            return Err("TMDB_BASE_URL is empty".into());
        }
        if self.tmdb_timeout.is_some_and(|t| t.is_zero()) {
            return Err("TMDB_TIMEOUT_SECS must be greater than zero".into());
        }
        Ok(())
    }
}

/// Whole seconds from an env value. Unset or blank means "not configured".
fn parse_secs(raw: Option<&str>) -> anyhow::Result<Option<Duration>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let secs: u64 = value
                .parse()
                .with_context(|| format!("expected whole seconds, got {value:?}"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
    }
}
