use poem_openapi::payload::Json;

use crate::{
    api::models::{ErrorDto, RegionsResponse, WatchProvidersResponse},
    catalog::Catalog,
    domain::models::MediaKind,
    error::CatalogError,
};

pub struct WatchProviderService<'a> {
    pub catalog: &'a Catalog,
}

impl<'a> WatchProviderService<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn for_media(
        &self,
        kind: MediaKind,
        id: &str,
        region: Option<&str>,
        user_id: Option<&str>,
    ) -> WatchProvidersResponse {
        let result = async {
            let region = self.catalog.preferred_region(user_id, region).await?;
            let configuration = self.catalog.configuration().await?;
            match kind {
                MediaKind::Show => {
                    self.catalog
                        .get_show_watch_providers(id, &configuration, region.as_deref())
                        .await
                }
                MediaKind::Movie => {
                    self.catalog
                        .get_movie_watch_providers(id, &configuration, region.as_deref())
                        .await
                }
            }
        }
        .await;

        match result {
            Ok(providers) => {
                WatchProvidersResponse::Ok(Json(providers.into_iter().map(Into::into).collect()))
            }
            Err(e @ CatalogError::Upstream(_)) => {
                tracing::error!(error = ?e, id, %kind, "failed to load watch providers");
                WatchProvidersResponse::BadGateway(Json(ErrorDto::from(&e)))
            }
            Err(e) => {
                tracing::error!(error = ?e, id, %kind, "failed to resolve region");
                WatchProvidersResponse::InternalServerError(Json(ErrorDto::from(&e)))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn regions(&self) -> RegionsResponse {
        match self.catalog.get_watch_provider_regions().await {
            Ok(regions) => RegionsResponse::Ok(Json(regions.into_iter().map(Into::into).collect())),
            Err(e) => {
                tracing::error!(error = ?e, "failed to list watch provider regions");
                RegionsResponse::BadGateway(Json(ErrorDto::from(&e)))
            }
        }
    }
}
