use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use entities::{cache_entry, user_preferences};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};

use super::{CacheEntry, CacheKind, CacheStore, PreferencesRepo};
use crate::domain::models::UserPreferences;

#[derive(Clone, Debug)]
pub struct SqliteCacheStore {
    db: Arc<DatabaseConnection>,
}

impl SqliteCacheStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<cache_entry::Model> for CacheEntry {
    type Error = anyhow::Error;

    fn try_from(model: cache_entry::Model) -> Result<Self, Self::Error> {
        Ok(CacheEntry {
            kind: model.kind.parse()?,
            key: model.cache_key,
            data: model.data,
            stored_at: model.stored_at,
        })
    }
}

#[async_trait::async_trait]
impl CacheStore for SqliteCacheStore {
    async fn get(&self, key: &str, kind: Option<CacheKind>) -> anyhow::Result<Option<CacheEntry>> {
        let mut query = cache_entry::Entity::find().filter(cache_entry::Column::CacheKey.eq(key));
        if let Some(kind) = kind {
            query = query.filter(cache_entry::Column::Kind.eq(kind.as_str()));
        }
        let model = query
            .order_by_desc(cache_entry::Column::StoredAt)
            .one(self.db.as_ref())
            .await
            .with_context(|| format!("Failed to query cache entry {key}"))?;
        model.map(CacheEntry::try_from).transpose()
    }

    async fn put(&self, entry: CacheEntry) -> anyhow::Result<()> {
        let key = entry.key.clone();
        let model = cache_entry::ActiveModel {
            cache_key: Set(entry.key),
            kind: Set(entry.kind.as_str().to_string()),
            data: Set(entry.data),
            stored_at: Set(entry.stored_at),
        };
        cache_entry::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([cache_entry::Column::CacheKey, cache_entry::Column::Kind])
                    .update_columns([cache_entry::Column::Data, cache_entry::Column::StoredAt])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .with_context(|| format!("Failed to store cache entry {key}"))?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct SqlitePreferencesRepo {
    db: Arc<DatabaseConnection>,
}

impl SqlitePreferencesRepo {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl PreferencesRepo for SqlitePreferencesRepo {
    async fn get(&self, user_id: &str) -> anyhow::Result<Option<UserPreferences>> {
        let model = user_preferences::Entity::find_by_id(user_id.to_string())
            .one(self.db.as_ref())
            .await
            .with_context(|| format!("Failed to load preferences for {user_id}"))?;
        Ok(model.map(|m| UserPreferences {
            user_id: m.user_id,
            watch_provider_region: m.watch_provider_region,
        }))
    }

    async fn set(&self, preferences: UserPreferences) -> anyhow::Result<()> {
        let user_id = preferences.user_id.clone();
        let model = user_preferences::ActiveModel {
            user_id: Set(preferences.user_id),
            watch_provider_region: Set(preferences.watch_provider_region),
            updated_at: Set(Utc::now()),
        };
        user_preferences::Entity::insert(model)
            .on_conflict(
                OnConflict::column(user_preferences::Column::UserId)
                    .update_columns([
                        user_preferences::Column::WatchProviderRegion,
                        user_preferences::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .with_context(|| format!("Failed to store preferences for {user_id}"))?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;
    use migration::MigratorTrait;
    use sea_orm::{ConnectOptions, Database};
    use serde_json::json;

    /// Fresh migrated in-memory database. One pooled connection, since every
    /// sqlite `:memory:` connection is its own database.
    pub(crate) async fn memory_db() -> Arc<DatabaseConnection> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        Arc::new(db)
    }

    fn entry(key: &str, kind: CacheKind, data: serde_json::Value) -> CacheEntry {
        CacheEntry {
            key: key.into(),
            kind,
            data,
            stored_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn get_filters_by_kind() {
        let store = SqliteCacheStore::new(memory_db().await);
        store
            .put(entry("42", CacheKind::Show, json!({ "__type": "show", "id": 42 })))
            .await
            .unwrap();
        store
            .put(entry("42", CacheKind::ShowWatchProviders, json!({ "id": 42, "results": {} })))
            .await
            .unwrap();

        let show = store.get("42", Some(CacheKind::Show)).await.unwrap().unwrap();
        assert_eq!(show.data["__type"], "show");
        let providers = store
            .get("42", Some(CacheKind::ShowWatchProviders))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(providers.kind, CacheKind::ShowWatchProviders);
        assert!(store.get("42", Some(CacheKind::Movie)).await.unwrap().is_none());
        assert!(store.get("43", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unfiltered_get_returns_latest_entry() {
        let store = SqliteCacheStore::new(memory_db().await);
        let mut older = entry("7", CacheKind::Movie, json!({ "id": 7, "title": "Older" }));
        older.stored_at = Utc::now() - Duration::hours(1);
        store.put(older).await.unwrap();
        store
            .put(entry("7", CacheKind::Show, json!({ "id": 7, "name": "Newer" })))
            .await
            .unwrap();

        let latest = store.get("7", None).await.unwrap().unwrap();
        assert_eq!(latest.kind, CacheKind::Show);
    }

    #[tokio::test]
    async fn put_overwrites_same_key_and_kind() {
        let store = SqliteCacheStore::new(memory_db().await);
        let data = json!({ "results": [{ "iso_3166_1": "US", "native_name": "United States" }] });
        store
            .put(entry("watchProviderRegions", CacheKind::WatchProviderRegions, json!({ "results": [] })))
            .await
            .unwrap();
        store
            .put(entry("watchProviderRegions", CacheKind::WatchProviderRegions, data.clone()))
            .await
            .unwrap();
        let first = store.get("watchProviderRegions", None).await.unwrap().unwrap();

        store
            .put(entry("watchProviderRegions", CacheKind::WatchProviderRegions, data.clone()))
            .await
            .unwrap();
        let second = store.get("watchProviderRegions", None).await.unwrap().unwrap();

        assert_eq!(first.data, data);
        assert_eq!(second.data, first.data);
        assert_eq!(second.kind, first.kind);
    }

    #[tokio::test]
    async fn preferences_upsert() {
        let repo = SqlitePreferencesRepo::new(memory_db().await);
        assert!(repo.get("user-1").await.unwrap().is_none());

        repo.set(UserPreferences {
            user_id: "user-1".into(),
            watch_provider_region: Some("AU".into()),
        })
        .await
        .unwrap();
        repo.set(UserPreferences {
            user_id: "user-1".into(),
            watch_provider_region: Some("NZ".into()),
        })
        .await
        .unwrap();

        let prefs = repo.get("user-1").await.unwrap().unwrap();
        assert_eq!(prefs.watch_provider_region.as_deref(), Some("NZ"));
    }
}
