use poem_openapi::payload::Json;

use crate::{
    api::models::{ErrorDto, ImagesResponse},
    catalog::Catalog,
};

pub struct ImageService<'a> {
    pub catalog: &'a Catalog,
}

impl<'a> ImageService<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn images(&self, image_path: Option<&str>) -> ImagesResponse {
        match self.catalog.configuration().await {
            Ok(configuration) => {
                ImagesResponse::Ok(Json(self.catalog.get_images(image_path, &configuration).into()))
            }
            Err(e) => {
                tracing::error!(error = ?e, "failed to load image configuration");
                ImagesResponse::BadGateway(Json(ErrorDto::from(&e)))
            }
        }
    }
}
