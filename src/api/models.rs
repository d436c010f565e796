use std::collections::BTreeMap;

use poem_openapi::{ApiResponse, Enum, Object, payload::Json, payload::PlainText};

use crate::{
    domain::models::{
        ImageRole, ImageSet, Media, MediaKind, PreferencesUpdate, PricedWatchProvider, UserPreferences,
        WatchProvider, WatchProviderRegion,
    },
    error::CatalogError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "lowercase")]
pub enum MediaTypeDto {
    Movie,
    Show,
}

impl From<MediaKind> for MediaTypeDto {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => MediaTypeDto::Movie,
            MediaKind::Show => MediaTypeDto::Show,
        }
    }
}

/// Absolute image URLs keyed by size (`xsmall` .. `original`). Empty when there is no image.
#[derive(Debug, Clone, Default, PartialEq, Object)]
pub struct ImageSetDto {
    pub poster: BTreeMap<String, String>,
    pub backdrop: BTreeMap<String, String>,
    pub logo: BTreeMap<String, String>,
    pub profile: BTreeMap<String, String>,
    pub still: BTreeMap<String, String>,
}

impl From<ImageSet> for ImageSetDto {
    fn from(images: ImageSet) -> Self {
        let sized = |role: ImageRole| -> BTreeMap<String, String> {
            images
                .role(role)
                .iter()
                .map(|(size, url)| (size.as_str().to_string(), url.clone()))
                .collect()
        };
        ImageSetDto {
            poster: sized(ImageRole::Poster),
            backdrop: sized(ImageRole::Backdrop),
            logo: sized(ImageRole::Logo),
            profile: sized(ImageRole::Profile),
            still: sized(ImageRole::Still),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Object)]
#[oai(rename_all = "camelCase")]
pub struct PricedWatchProviderDto {
    pub name: String,
    pub logo_url: String,
}

impl From<PricedWatchProvider> for PricedWatchProviderDto {
    fn from(p: PricedWatchProvider) -> Self {
        PricedWatchProviderDto {
            name: p.name,
            logo_url: p.logo_url,
        }
    }
}

fn priced(providers: Option<Vec<PricedWatchProvider>>) -> Option<Vec<PricedWatchProviderDto>> {
    providers.map(|list| list.into_iter().map(Into::into).collect())
}

/// Availability in one region. Pricing options TMDB did not list are left out.
#[derive(Debug, Clone, PartialEq, Object)]
pub struct WatchProviderDto {
    pub region: String,
    #[oai(skip_serializing_if_is_none)]
    pub flatrate: Option<Vec<PricedWatchProviderDto>>,
    #[oai(skip_serializing_if_is_none)]
    pub buy: Option<Vec<PricedWatchProviderDto>>,
    #[oai(skip_serializing_if_is_none)]
    pub ads: Option<Vec<PricedWatchProviderDto>>,
    #[oai(skip_serializing_if_is_none)]
    pub rent: Option<Vec<PricedWatchProviderDto>>,
    #[oai(skip_serializing_if_is_none)]
    pub free: Option<Vec<PricedWatchProviderDto>>,
}

impl From<WatchProvider> for WatchProviderDto {
    fn from(w: WatchProvider) -> Self {
        WatchProviderDto {
            region: w.region,
            flatrate: priced(w.flatrate),
            buy: priced(w.buy),
            ads: priced(w.ads),
            rent: priced(w.rent),
            free: priced(w.free),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Object)]
#[oai(rename_all = "camelCase")]
pub struct MediaDto {
    pub id: i64,
    pub title: String,
    pub images: ImageSetDto,
    #[oai(rename = "type")]
    pub media_type: MediaTypeDto,
    pub genres: Vec<String>,
    #[oai(skip_serializing_if_is_none)]
    pub is_watched: Option<bool>,
    #[oai(skip_serializing_if_is_none)]
    pub watch_providers: Option<Vec<WatchProviderDto>>,
}

impl From<Media> for MediaDto {
    fn from(m: Media) -> Self {
        MediaDto {
            id: m.id,
            title: m.title,
            images: m.images.into(),
            media_type: m.kind.into(),
            genres: m.genres,
            is_watched: m.is_watched,
            watch_providers: m
                .watch_providers
                .map(|list| list.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Object)]
#[oai(rename_all = "camelCase")]
pub struct RegionDto {
    pub country_id: String,
    pub name: String,
}

impl From<WatchProviderRegion> for RegionDto {
    fn from(r: WatchProviderRegion) -> Self {
        RegionDto {
            country_id: r.country_id,
            name: r.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Object)]
#[oai(rename_all = "camelCase")]
pub struct PreferencesDto {
    pub user_id: String,
    pub watch_provider_region: Option<String>,
}

impl From<UserPreferences> for PreferencesDto {
    fn from(p: UserPreferences) -> Self {
        PreferencesDto {
            user_id: p.user_id,
            watch_provider_region: p.watch_provider_region,
        }
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct PreferencesUpdateDto {
    /// ISO 3166-1 region code; omit to keep the saved one
    pub watch_provider_region: Option<String>,
}

impl From<PreferencesUpdateDto> for PreferencesUpdate {
    fn from(dto: PreferencesUpdateDto) -> Self {
        PreferencesUpdate {
            watch_provider_region: dto.watch_provider_region,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub message: String,
}

impl From<&CatalogError> for ErrorDto {
    fn from(err: &CatalogError) -> Self {
        let message = match err {
            CatalogError::Upstream(e) => format!("TMDB error: {e}"),
            CatalogError::Preferences { .. } => err.to_string(),
        };
        ErrorDto { message }
    }
}

#[derive(ApiResponse)]
pub enum StatusResponse {
    /// TMDB is reachable
    #[oai(status = 200)]
    Ok(PlainText<String>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum MediaResponse {
    /// Movie or show details with watch providers
    #[oai(status = 200)]
    Ok(Json<MediaDto>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),

    /// Stored preferences could not be read
    #[oai(status = 500)]
    InternalServerError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum MediaListResponse {
    /// Search results in TMDB order
    #[oai(status = 200)]
    Ok(Json<Vec<MediaDto>>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum WatchProvidersResponse {
    /// Watch providers per region
    #[oai(status = 200)]
    Ok(Json<Vec<WatchProviderDto>>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),

    /// Stored preferences could not be read
    #[oai(status = 500)]
    InternalServerError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum RegionsResponse {
    /// Regions TMDB has watch provider data for
    #[oai(status = 200)]
    Ok(Json<Vec<RegionDto>>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum ImagesResponse {
    /// Image URLs for every role and size
    #[oai(status = 200)]
    Ok(Json<ImageSetDto>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum PreferencesResponse {
    /// Stored preferences, or defaults
    #[oai(status = 200)]
    Ok(Json<PreferencesDto>),

    /// Preferences store error
    #[oai(status = 500)]
    InternalServerError(Json<ErrorDto>),
}
