// Traits for persistence; sea-orm implementations live in `sqlite`

pub mod sqlite;

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::models::{MediaKind, UserPreferences};

/// Discriminator stored next to every cached payload. Movie ids, show ids and a
/// show's watch providers all share the numeric TMDB id as their key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Movie,
    Show,
    MovieWatchProviders,
    ShowWatchProviders,
    MovieSearch,
    ShowSearch,
    Configuration,
    WatchProviderRegions,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Movie => "movie",
            CacheKind::Show => "show",
            CacheKind::MovieWatchProviders => "movieWatchProviders",
            CacheKind::ShowWatchProviders => "showWatchProviders",
            CacheKind::MovieSearch => "movieSearch",
            CacheKind::ShowSearch => "showSearch",
            CacheKind::Configuration => "configuration",
            CacheKind::WatchProviderRegions => "watchProviderRegions",
        }
    }

    /// Whether reads must match this kind. Singleton resources have a key of
    /// their own and are looked up by key alone.
    pub fn filters_reads(&self) -> bool {
        !matches!(self, CacheKind::Configuration | CacheKind::WatchProviderRegions)
    }

    pub fn media(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => CacheKind::Movie,
            MediaKind::Show => CacheKind::Show,
        }
    }

    pub fn watch_providers(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => CacheKind::MovieWatchProviders,
            MediaKind::Show => CacheKind::ShowWatchProviders,
        }
    }

    pub fn search(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => CacheKind::MovieSearch,
            MediaKind::Show => CacheKind::ShowSearch,
        }
    }
}

impl FromStr for CacheKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "movie" => CacheKind::Movie,
            "show" => CacheKind::Show,
            "movieWatchProviders" => CacheKind::MovieWatchProviders,
            "showWatchProviders" => CacheKind::ShowWatchProviders,
            "movieSearch" => CacheKind::MovieSearch,
            "showSearch" => CacheKind::ShowSearch,
            "configuration" => CacheKind::Configuration,
            "watchProviderRegions" => CacheKind::WatchProviderRegions,
            other => anyhow::bail!("unknown cache kind: {other}"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub kind: CacheKind,
    /// Upstream-shaped payload as serialized JSON
    pub data: serde_json::Value,
    pub stored_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Most recently stored entry for `key`, restricted to `kind` when given.
    async fn get(&self, key: &str, kind: Option<CacheKind>) -> anyhow::Result<Option<CacheEntry>>;
    /// Insert or overwrite the entry stored under `(key, kind)`.
    async fn put(&self, entry: CacheEntry) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait PreferencesRepo: Send + Sync {
    async fn get(&self, user_id: &str) -> anyhow::Result<Option<UserPreferences>>;
    async fn set(&self, preferences: UserPreferences) -> anyhow::Result<()>;
}
