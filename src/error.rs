use thiserror::Error;

/// Failure talking to TMDB. `operation` and `target` end up in the message so a
/// log line alone says which call broke.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("Failed to {operation} {target}: {source}")]
    Request {
        operation: &'static str,
        target: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to {operation} {target}: malformed response body: {source}")]
    Decode {
        operation: &'static str,
        target: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Cache failures never reach callers; they are logged and the read path carries on.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache read for {key} ({kind}) failed: {source}")]
    Read {
        key: String,
        kind: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("cache write for {key} ({kind}) failed: {source}")]
    Write {
        key: String,
        kind: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Upstream(#[from] TmdbError),

    #[error("preferences store failed for user {user_id}: {source}")]
    Preferences {
        user_id: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
