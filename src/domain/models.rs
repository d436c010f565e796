// Domain models handed to the API layer, independent of TMDB's wire shapes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Movie and show ids live in separate TMDB id spaces, so a `Media` is only
/// identified by `(id, kind)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Show,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "show",
        }
    }

    /// Path segment TMDB uses for this kind (`/movie/..`, `/tv/..`).
    pub fn upstream_category(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "tv",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    Poster,
    Backdrop,
    Logo,
    Profile,
    Still,
}

impl ImageRole {
    pub const ALL: [ImageRole; 5] = [
        ImageRole::Poster,
        ImageRole::Backdrop,
        ImageRole::Logo,
        ImageRole::Profile,
        ImageRole::Still,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Xsmall,
    Small,
    Medium,
    Large,
    Xlarge,
    Original,
}

impl ImageSize {
    pub const ALL: [ImageSize; 6] = [
        ImageSize::Xsmall,
        ImageSize::Small,
        ImageSize::Medium,
        ImageSize::Large,
        ImageSize::Xlarge,
        ImageSize::Original,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Xsmall => "xsmall",
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
            ImageSize::Xlarge => "xlarge",
            ImageSize::Original => "original",
        }
    }
}

pub type SizedImages = BTreeMap<ImageSize, String>;

/// Absolute image URLs per role and size. A role with no image is an empty map,
/// never a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    pub poster: SizedImages,
    pub backdrop: SizedImages,
    pub logo: SizedImages,
    pub profile: SizedImages,
    pub still: SizedImages,
}

impl ImageSet {
    pub fn role(&self, role: ImageRole) -> &SizedImages {
        match role {
            ImageRole::Poster => &self.poster,
            ImageRole::Backdrop => &self.backdrop,
            ImageRole::Logo => &self.logo,
            ImageRole::Profile => &self.profile,
            ImageRole::Still => &self.still,
        }
    }

    pub fn role_mut(&mut self, role: ImageRole) -> &mut SizedImages {
        match role {
            ImageRole::Poster => &mut self.poster,
            ImageRole::Backdrop => &mut self.backdrop,
            ImageRole::Logo => &mut self.logo,
            ImageRole::Profile => &mut self.profile,
            ImageRole::Still => &mut self.still,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedWatchProvider {
    pub name: String,
    pub logo_url: String,
}

/// Where a title can be watched in one region. A `None` pricing option means
/// it is not offered there; `Some(vec![])` is kept as sent by TMDB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchProvider {
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flatrate: Option<Vec<PricedWatchProvider>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy: Option<Vec<PricedWatchProvider>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ads: Option<Vec<PricedWatchProvider>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent: Option<Vec<PricedWatchProvider>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free: Option<Vec<PricedWatchProvider>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchProviderRegion {
    pub country_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    pub title: String,
    pub images: ImageSet,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_watched: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_providers: Option<Vec<WatchProvider>>,
}

pub type MediaList = Vec<Media>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: String,
    pub watch_provider_region: Option<String>,
}

/// Partial update: fields left `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub watch_provider_region: Option<String>,
}
