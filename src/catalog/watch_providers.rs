use std::time::Instant;

use super::Catalog;
use crate::{
    domain::{
        mapping::{map_region_response, map_watch_provider_response},
        models::{MediaKind, WatchProvider, WatchProviderRegion},
    },
    error::CatalogResult,
    storage::CacheKind,
    tmdb_client::{TmdbConfiguration, TmdbWatchProviderRegionsResponse, TmdbWatchProviderResponse},
};

pub const WATCH_PROVIDER_REGIONS_CACHE_KEY: &str = "watchProviderRegions";

impl Catalog {
    #[tracing::instrument(level = "debug", skip(self, configuration))]
    pub async fn get_watch_providers(
        &self,
        id: &str,
        kind: MediaKind,
        configuration: &TmdbConfiguration,
        region: Option<&str>,
    ) -> CatalogResult<Vec<WatchProvider>> {
        let started = Instant::now();
        let response: TmdbWatchProviderResponse = self
            .cache
            .read_through(id, CacheKind::watch_providers(kind), || {
                self.client.get_watch_providers(id, kind)
            })
            .await?;

        let providers = map_watch_provider_response(&response, configuration, region);
        tracing::debug!(
            id,
            %kind,
            regions = providers.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "resolved watch providers"
        );
        Ok(providers)
    }

    pub async fn get_show_watch_providers(
        &self,
        id: &str,
        configuration: &TmdbConfiguration,
        region: Option<&str>,
    ) -> CatalogResult<Vec<WatchProvider>> {
        self.get_watch_providers(id, MediaKind::Show, configuration, region)
            .await
    }

    pub async fn get_movie_watch_providers(
        &self,
        id: &str,
        configuration: &TmdbConfiguration,
        region: Option<&str>,
    ) -> CatalogResult<Vec<WatchProvider>> {
        self.get_watch_providers(id, MediaKind::Movie, configuration, region)
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_watch_provider_regions(&self) -> CatalogResult<Vec<WatchProviderRegion>> {
        let started = Instant::now();
        let response: TmdbWatchProviderRegionsResponse = self
            .cache
            .read_through(
                WATCH_PROVIDER_REGIONS_CACHE_KEY,
                CacheKind::WatchProviderRegions,
                || self.client.get_watch_provider_regions(),
            )
            .await?;

        let regions = map_region_response(&response);
        tracing::debug!(
            regions = regions.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "resolved watch provider regions"
        );
        Ok(regions)
    }
}
