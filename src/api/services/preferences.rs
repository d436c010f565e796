use poem_openapi::payload::Json;

use crate::{
    api::models::{ErrorDto, PreferencesResponse, PreferencesUpdateDto},
    catalog::Catalog,
    domain::models::UserPreferences,
    error::CatalogResult,
};

pub struct PreferencesService<'a> {
    pub catalog: &'a Catalog,
}

impl<'a> PreferencesService<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get(&self, user_id: &str) -> PreferencesResponse {
        respond(user_id, self.catalog.get_user_preferences(user_id).await)
    }

    #[tracing::instrument(level = "debug", skip(self, update))]
    pub async fn update(&self, user_id: &str, update: PreferencesUpdateDto) -> PreferencesResponse {
        respond(
            user_id,
            self.catalog
                .update_user_preferences(user_id, update.into())
                .await,
        )
    }
}

fn respond(user_id: &str, result: CatalogResult<UserPreferences>) -> PreferencesResponse {
    match result {
        Ok(preferences) => PreferencesResponse::Ok(Json(preferences.into())),
        Err(e) => {
            tracing::error!(error = ?e, user_id, "preferences request failed");
            PreferencesResponse::InternalServerError(Json(ErrorDto::from(&e)))
        }
    }
}
