use super::Catalog;
use crate::{
    domain::models::{PreferencesUpdate, UserPreferences},
    error::{CatalogError, CatalogResult},
};

impl Catalog {
    /// Stored preferences, or defaults for a user that never saved any.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_user_preferences(&self, user_id: &str) -> CatalogResult<UserPreferences> {
        let stored = self
            .preferences
            .get(user_id)
            .await
            .map_err(|source| CatalogError::Preferences {
                user_id: user_id.to_string(),
                source,
            })?;
        Ok(stored.unwrap_or_else(|| UserPreferences {
            user_id: user_id.to_string(),
            ..Default::default()
        }))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn update_user_preferences(
        &self,
        user_id: &str,
        update: PreferencesUpdate,
    ) -> CatalogResult<UserPreferences> {
        let mut preferences = self.get_user_preferences(user_id).await?;
        if let Some(region) = update.watch_provider_region {
            preferences.watch_provider_region = Some(region);
        }

        self.preferences
            .set(preferences.clone())
            .await
            .map_err(|source| CatalogError::Preferences {
                user_id: user_id.to_string(),
                source,
            })?;
        tracing::info!(user_id, region = ?preferences.watch_provider_region, "updated preferences");
        Ok(preferences)
    }

    /// Region used to narrow watch providers: an explicit one wins, then the
    /// user's saved region, otherwise all regions.
    pub async fn preferred_region(
        &self,
        user_id: Option<&str>,
        explicit: Option<&str>,
    ) -> CatalogResult<Option<String>> {
        if let Some(region) = explicit {
            return Ok(Some(region.to_string()));
        }
        match user_id {
            Some(user_id) => Ok(self.get_user_preferences(user_id).await?.watch_provider_region),
            None => Ok(None),
        }
    }
}
