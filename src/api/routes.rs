use std::sync::Arc;

use poem_openapi::{
    OpenApi,
    param::{Path, Query},
    payload::Json,
};

use super::models::{
    ImagesResponse, MediaListResponse, MediaResponse, PreferencesResponse, PreferencesUpdateDto,
    RegionsResponse, StatusResponse, WatchProvidersResponse,
};
use super::services::{
    health::HealthService, images::ImageService, media::MediaService, preferences::PreferencesService,
    watch_providers::WatchProviderService,
};
use crate::{catalog::Catalog, domain::models::MediaKind};

pub struct CinemusApi {
    pub catalog: Arc<Catalog>,
}

#[OpenApi]
impl CinemusApi {
    /// Checks that TMDB answers with its image configuration
    #[oai(path = "/status", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn status(&self) -> StatusResponse {
        tracing::debug!("handling /status");
        HealthService::new(&self.catalog).status_text().await
    }

    /// Show details with watch providers
    #[oai(path = "/shows/:id", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, id, region, user_id))]
    async fn get_show(
        &self,
        id: Path<String>,
        /// Only keep watch providers for this ISO 3166-1 region
        Query(region): Query<Option<String>>,
        /// Fall back to this user's saved region
        Query(user_id): Query<Option<String>>,
    ) -> MediaResponse {
        tracing::debug!(id = %id.0, region = region.as_deref().unwrap_or(""), "handling get_show");
        MediaService::new(&self.catalog)
            .get_media(MediaKind::Show, &id.0, region.as_deref(), user_id.as_deref())
            .await
    }

    #[oai(path = "/shows/:id/watch-providers", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, id, region, user_id))]
    async fn get_show_watch_providers(
        &self,
        id: Path<String>,
        Query(region): Query<Option<String>>,
        Query(user_id): Query<Option<String>>,
    ) -> WatchProvidersResponse {
        WatchProviderService::new(&self.catalog)
            .for_media(MediaKind::Show, &id.0, region.as_deref(), user_id.as_deref())
            .await
    }

    /// Movie details with watch providers
    #[oai(path = "/movies/:id", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, id, region, user_id))]
    async fn get_movie(
        &self,
        id: Path<String>,
        /// Only keep watch providers for this ISO 3166-1 region
        Query(region): Query<Option<String>>,
        /// Fall back to this user's saved region
        Query(user_id): Query<Option<String>>,
    ) -> MediaResponse {
        tracing::debug!(id = %id.0, region = region.as_deref().unwrap_or(""), "handling get_movie");
        MediaService::new(&self.catalog)
            .get_media(MediaKind::Movie, &id.0, region.as_deref(), user_id.as_deref())
            .await
    }

    #[oai(path = "/movies/:id/watch-providers", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, id, region, user_id))]
    async fn get_movie_watch_providers(
        &self,
        id: Path<String>,
        Query(region): Query<Option<String>>,
        Query(user_id): Query<Option<String>>,
    ) -> WatchProvidersResponse {
        WatchProviderService::new(&self.catalog)
            .for_media(MediaKind::Movie, &id.0, region.as_deref(), user_id.as_deref())
            .await
    }

    #[oai(path = "/search/shows", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, query))]
    async fn search_shows(&self, Query(query): Query<String>) -> MediaListResponse {
        MediaService::new(&self.catalog)
            .search(MediaKind::Show, &query)
            .await
    }

    #[oai(path = "/search/movies", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, query))]
    async fn search_movies(&self, Query(query): Query<String>) -> MediaListResponse {
        MediaService::new(&self.catalog)
            .search(MediaKind::Movie, &query)
            .await
    }

    /// Regions TMDB has watch provider data for
    #[oai(path = "/watch-providers/regions", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn watch_provider_regions(&self) -> RegionsResponse {
        WatchProviderService::new(&self.catalog).regions().await
    }

    /// Image URLs in every role and size for a TMDB file path
    #[oai(path = "/images", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, path))]
    async fn images(&self, Query(path): Query<Option<String>>) -> ImagesResponse {
        ImageService::new(&self.catalog)
            .images(path.as_deref())
            .await
    }

    #[oai(path = "/users/:user_id/preferences", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, user_id))]
    async fn get_preferences(&self, user_id: Path<String>) -> PreferencesResponse {
        PreferencesService::new(&self.catalog).get(&user_id.0).await
    }

    #[oai(path = "/users/:user_id/preferences", method = "put")]
    #[tracing::instrument(level = "debug", skip(self, user_id, body))]
    async fn put_preferences(
        &self,
        user_id: Path<String>,
        body: Json<PreferencesUpdateDto>,
    ) -> PreferencesResponse {
        PreferencesService::new(&self.catalog)
            .update(&user_id.0, body.0)
            .await
    }
}
