use super::Catalog;
use crate::{error::CatalogResult, storage::CacheKind, tmdb_client::TmdbConfiguration};

pub const CONFIGURATION_CACHE_KEY: &str = "configuration";

impl Catalog {
    /// TMDB image configuration, cached under a fixed key.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn configuration(&self) -> CatalogResult<TmdbConfiguration> {
        let configuration = self
            .cache
            .read_through(CONFIGURATION_CACHE_KEY, CacheKind::Configuration, || {
                self.client.get_configuration()
            })
            .await?;
        Ok(configuration)
    }
}
