use poem_openapi::payload::{Json, PlainText};

use crate::{
    api::models::{ErrorDto, StatusResponse},
    catalog::Catalog,
};

pub struct HealthService<'a> {
    pub catalog: &'a Catalog,
}

impl<'a> HealthService<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn status_text(&self) -> StatusResponse {
        match self.catalog.configuration().await {
            Ok(configuration) => StatusResponse::Ok(PlainText(format!(
                "TMDB reachable images={}",
                configuration.image_base_url()
            ))),
            Err(e) => {
                tracing::error!(error = ?e, "status check failed");
                StatusResponse::BadGateway(Json(ErrorDto::from(&e)))
            }
        }
    }
}
