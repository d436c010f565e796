use poem_openapi::payload::Json;

use crate::{
    api::models::{ErrorDto, MediaListResponse, MediaResponse},
    catalog::Catalog,
    domain::models::MediaKind,
    error::CatalogError,
};

pub struct MediaService<'a> {
    pub catalog: &'a Catalog,
}

impl<'a> MediaService<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Details for one title. The watch providers follow `region`, else the
    /// user's saved region, else every region.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_media(
        &self,
        kind: MediaKind,
        id: &str,
        region: Option<&str>,
        user_id: Option<&str>,
    ) -> MediaResponse {
        let result = async {
            let region = self.catalog.preferred_region(user_id, region).await?;
            self.catalog.get_media(id, kind, region.as_deref()).await
        }
        .await;

        match result {
            Ok(media) => MediaResponse::Ok(Json(media.into())),
            Err(e @ CatalogError::Upstream(_)) => {
                tracing::error!(error = ?e, id, %kind, "failed to load media");
                MediaResponse::BadGateway(Json(ErrorDto::from(&e)))
            }
            Err(e) => {
                tracing::error!(error = ?e, id, %kind, "failed to resolve region");
                MediaResponse::InternalServerError(Json(ErrorDto::from(&e)))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search(&self, kind: MediaKind, query: &str) -> MediaListResponse {
        match self.catalog.search_media(kind, query).await {
            Ok(results) => {
                MediaListResponse::Ok(Json(results.into_iter().map(Into::into).collect()))
            }
            Err(e) => {
                tracing::error!(error = ?e, query, %kind, "search failed");
                MediaListResponse::BadGateway(Json(ErrorDto::from(&e)))
            }
        }
    }
}
