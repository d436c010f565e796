// Mapping from TMDB DTOs to domain models

use super::image::build_images;
use super::models::{
    ImageSize, Media, MediaKind, MediaList, PricedWatchProvider, WatchProvider, WatchProviderRegion,
};
use crate::tmdb_client::{
    MediaDetails, SearchResult, TmdbConfiguration, TmdbRegionWatchProviders,
    TmdbWatchProviderDetails, TmdbWatchProviderRegionsResponse, TmdbWatchProviderResponse,
};

/// Search hits carry no genre names, only ids, so `genres` stays empty.
pub fn map_search_result(
    result: &SearchResult,
    configuration: &TmdbConfiguration,
    watch_providers: Option<Vec<WatchProvider>>,
) -> Media {
    let (id, title, poster_path, kind) = match result {
        SearchResult::Movie(m) => (m.id, &m.title, m.poster_path.as_deref(), MediaKind::Movie),
        SearchResult::Show(s) => (s.id, &s.name, s.poster_path.as_deref(), MediaKind::Show),
    };

    Media {
        id,
        title: title.clone(),
        images: build_images(poster_path, configuration),
        kind,
        genres: vec![],
        is_watched: None,
        watch_providers,
    }
}

pub fn map_detail_result(
    result: &MediaDetails,
    configuration: &TmdbConfiguration,
    watch_providers: Option<Vec<WatchProvider>>,
) -> Media {
    let (id, title, poster_path, genres, kind) = match result {
        MediaDetails::Movie(m) => (
            m.id,
            &m.title,
            m.poster_path.as_deref(),
            &m.genres,
            MediaKind::Movie,
        ),
        MediaDetails::Show(s) => (
            s.id,
            &s.name,
            s.poster_path.as_deref(),
            &s.genres,
            MediaKind::Show,
        ),
    };

    Media {
        id,
        title: title.clone(),
        images: build_images(poster_path, configuration),
        kind,
        genres: genres.iter().map(|g| g.name.clone()).collect(),
        is_watched: None,
        watch_providers,
    }
}

pub fn map_search_results(results: &[SearchResult], configuration: &TmdbConfiguration) -> MediaList {
    results
        .iter()
        .map(|r| map_search_result(r, configuration, None))
        .collect()
}

pub fn build_priced_watch_providers(
    details: &[TmdbWatchProviderDetails],
    configuration: &TmdbConfiguration,
) -> Vec<PricedWatchProvider> {
    details
        .iter()
        .map(|d| PricedWatchProvider {
            name: d.provider_name.clone(),
            logo_url: build_images(d.logo_path.as_deref(), configuration)
                .logo
                .remove(&ImageSize::Original)
                .unwrap_or_default(),
        })
        .collect()
}

fn map_region_providers(
    region: &str,
    providers: &TmdbRegionWatchProviders,
    configuration: &TmdbConfiguration,
) -> WatchProvider {
    let priced = |option: &Option<Vec<TmdbWatchProviderDetails>>| {
        option
            .as_deref()
            .map(|details| build_priced_watch_providers(details, configuration))
    };

    WatchProvider {
        region: region.to_string(),
        flatrate: priced(&providers.flatrate),
        buy: priced(&providers.buy),
        ads: priced(&providers.ads),
        rent: priced(&providers.rent),
        free: priced(&providers.free),
    }
}

/// One `WatchProvider` per region TMDB reports, optionally narrowed to a single
/// region. The region match is exact and case-sensitive.
pub fn map_watch_provider_response(
    response: &TmdbWatchProviderResponse,
    configuration: &TmdbConfiguration,
    region: Option<&str>,
) -> Vec<WatchProvider> {
    response
        .results
        .iter()
        .filter(|(code, _)| region.is_none_or(|wanted| wanted == code.as_str()))
        .map(|(code, providers)| map_region_providers(code, providers, configuration))
        .collect()
}

pub fn map_region_response(response: &TmdbWatchProviderRegionsResponse) -> Vec<WatchProviderRegion> {
    response
        .results
        .iter()
        .map(|r| WatchProviderRegion {
            country_id: r.iso_3166_1.clone(),
            name: r.native_name.clone(),
        })
        .collect()
}
