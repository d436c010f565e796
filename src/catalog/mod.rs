//! Read operations behind the HTTP API.
//!
//! Every operation resolves the TMDB configuration first, then whatever it
//! needs through the cache-aside accessor, and maps the upstream payloads into
//! domain models. Upstream failures propagate; there are no partial results.

mod configuration;
mod media;
mod preferences;
mod watch_providers;

use std::sync::Arc;

pub use configuration::CONFIGURATION_CACHE_KEY;
pub use watch_providers::WATCH_PROVIDER_REGIONS_CACHE_KEY;

use crate::{
    cache::CacheAside,
    domain::{image::build_images, models::ImageSet},
    storage::PreferencesRepo,
    tmdb_client::{TmdbClient, TmdbConfiguration},
};

/// Shared handles for all read operations, built once at startup.
#[derive(Clone)]
pub struct Catalog {
    client: TmdbClient,
    cache: CacheAside,
    preferences: Arc<dyn PreferencesRepo>,
}

impl Catalog {
    pub fn new(client: TmdbClient, cache: CacheAside, preferences: Arc<dyn PreferencesRepo>) -> Self {
        Self {
            client,
            cache,
            preferences,
        }
    }

    pub fn get_images(&self, path: Option<&str>, configuration: &TmdbConfiguration) -> ImageSet {
        build_images(path, configuration)
    }
}
