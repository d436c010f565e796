use std::{future::Future, sync::Arc};

use chrono::{Duration, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tokio::task::JoinHandle;

use crate::{
    error::{CacheError, TmdbError},
    storage::{CacheEntry, CacheKind, CacheStore},
};

/// Cache-aside access to upstream payloads.
///
/// Reads go to the store first; a miss calls upstream, returns the fresh value
/// and persists it on a detached task. The store is only an optimization: read
/// failures count as misses and write failures are logged, never returned.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    max_age: Option<Duration>,
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            max_age: None,
        }
    }

    /// Entries older than `max_age` are read as misses. Without it entries never go stale.
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    #[tracing::instrument(level = "debug", skip(self, kind, fetch_upstream), fields(kind = kind.as_str()))]
    pub async fn read_through<T, F, Fut>(
        &self,
        key: &str,
        kind: CacheKind,
        fetch_upstream: F,
    ) -> Result<T, TmdbError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, TmdbError>>,
    {
        if let Some(cached) = self.lookup(key, kind).await {
            tracing::debug!(key, "cache hit");
            return Ok(cached);
        }

        tracing::debug!(key, "cache miss, fetching upstream");
        let fresh = fetch_upstream().await?;
        // Not awaited: the caller gets its value whether or not the write lands.
        let _ = self.spawn_put(key, kind, &fresh);
        Ok(fresh)
    }

    /// Stored payload for `(key, kind)`, or `None` on miss, stale entry, read
    /// failure or a payload that no longer decodes as `T`.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str, kind: CacheKind) -> Option<T> {
        let filter = kind.filters_reads().then_some(kind);
        let entry = match self.store.get(key, filter).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(source) => {
                let err = CacheError::Read {
                    key: key.to_string(),
                    kind: kind.as_str(),
                    source,
                };
                tracing::warn!(error = %err, "treating cache read failure as a miss");
                return None;
            }
        };

        if let Some(max_age) = self.max_age {
            if Utc::now() - entry.stored_at > max_age {
                tracing::debug!(key, stored_at = %entry.stored_at, "cache entry is stale");
                return None;
            }
        }

        match serde_json::from_value(entry.data) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, key, kind = kind.as_str(), "cached payload does not decode, ignoring it");
                None
            }
        }
    }

    /// Persist `value` under `(key, kind)` on a detached task. The handle is only
    /// useful to callers that want to wait; the read path drops it.
    pub fn spawn_put<T: Serialize>(&self, key: &str, kind: CacheKind, value: &T) -> Option<JoinHandle<()>> {
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, key, kind = kind.as_str(), "failed to serialize value for cache");
                return None;
            }
        };
        let entry = CacheEntry {
            key: key.to_string(),
            kind,
            data,
            stored_at: Utc::now(),
        };

        let store = Arc::clone(&self.store);
        Some(tokio::spawn(async move {
            let key = entry.key.clone();
            if let Err(source) = store.put(entry).await {
                let err = CacheError::Write {
                    key,
                    kind: kind.as_str(),
                    source,
                };
                tracing::warn!(error = %err, "cache write failed");
            } else {
                tracing::debug!(key = %key, kind = kind.as_str(), "cache write complete");
            }
        }))
    }
}
