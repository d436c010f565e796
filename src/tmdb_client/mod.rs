use std::time::Duration;

use indexmap::IndexMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{domain::models::MediaKind, error::TmdbError};

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Clone, Debug)]
pub struct TmdbClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new client with the given base URL (e.g. "https://api.themoviedb.org/3").
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let base_url_str = base_url.into();
        tracing::debug!(base_url = %base_url_str, ?timeout, "creating TmdbClient");
        Ok(TmdbClient {
            base_url: base_url_str.trim_end_matches('/').to_string(),
            api_key: None,
            client,
        })
    }

    /// Return a client that sends the provided key as the `api_key` query parameter
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        operation: &'static str,
        target: &str,
    ) -> Result<T, TmdbError> {
        let url = self.url(path);
        tracing::debug!(%url, operation, target, "GET");
        let mut req = self.client.get(&url);
        if let Some(key) = &self.api_key {
            req = req.query(&[("api_key", key.as_str())]);
        }
        if !query.is_empty() {
            req = req.query(query);
        }

        // The request URL carries the api key, so it never goes into the error.
        let request_failed = |source: reqwest::Error| TmdbError::Request {
            operation,
            target: target.to_string(),
            source: source.without_url(),
        };
        let resp = req.send().await.map_err(request_failed)?;
        let status = resp.error_for_status().map_err(request_failed)?;
        let body = status.text().await.map_err(request_failed)?;
        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                let snippet_len = body.len().min(2000);
                let snippet = body.get(..snippet_len).unwrap_or_default();
                tracing::error!(error = %e, operation, target, body_snippet = %snippet, "failed to parse TMDB response");
                Err(TmdbError::Decode {
                    operation,
                    target: target.to_string(),
                    source: e,
                })
            }
        }
    }

    /// GET /movie/:id or /tv/:id
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_details(&self, id: &str, kind: MediaKind) -> Result<MediaDetails, TmdbError> {
        let path = format!("/{}/{}", kind.upstream_category(), id);
        let operation = match kind {
            MediaKind::Movie => "find movie with id",
            MediaKind::Show => "find show with id",
        };
        let details = match kind {
            MediaKind::Movie => {
                MediaDetails::Movie(self.get_json(&path, &[], operation, id).await?)
            }
            MediaKind::Show => MediaDetails::Show(self.get_json(&path, &[], operation, id).await?),
        };
        Ok(details)
    }

    /// GET /search/movie or /search/tv
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search(
        &self,
        kind: MediaKind,
        query: &str,
    ) -> Result<SearchResponse<SearchResult>, TmdbError> {
        let path = format!("/search/{}", kind.upstream_category());
        let q = [("query", query)];
        let response = match kind {
            MediaKind::Movie => self
                .get_json::<SearchResponse<TmdbSearchMovie>>(&path, &q, "search movies for", query)
                .await?
                .tag(SearchResult::Movie),
            MediaKind::Show => self
                .get_json::<SearchResponse<TmdbSearchShow>>(&path, &q, "search shows for", query)
                .await?
                .tag(SearchResult::Show),
        };
        tracing::debug!(%kind, query, total_results = response.total_results, "search complete");
        Ok(response)
    }

    /// GET /configuration
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_configuration(&self) -> Result<TmdbConfiguration, TmdbError> {
        self.get_json("/configuration", &[], "load", "configuration")
            .await
    }

    /// GET /tv/:id/watch/providers or /movie/:id/watch/providers
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_watch_providers(
        &self,
        id: &str,
        kind: MediaKind,
    ) -> Result<TmdbWatchProviderResponse, TmdbError> {
        let path = format!("/{}/{}/watch/providers", kind.upstream_category(), id);
        let operation = match kind {
            MediaKind::Movie => "find watch providers for movie",
            MediaKind::Show => "find watch providers for show",
        };
        self.get_json(&path, &[], operation, id).await
    }

    /// GET /watch/providers/regions
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_watch_provider_regions(
        &self,
    ) -> Result<TmdbWatchProviderRegionsResponse, TmdbError> {
        self.get_json("/watch/providers/regions", &[], "load", "watch provider regions")
            .await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse<T> {
    pub page: i64,
    pub results: Vec<T>,
    pub total_results: i64,
    pub total_pages: i64,
}

impl<T> SearchResponse<T> {
    fn tag<U>(self, tag: impl Fn(T) -> U) -> SearchResponse<U> {
        SearchResponse {
            page: self.page,
            results: self.results.into_iter().map(tag).collect(),
            total_results: self.total_results,
            total_pages: self.total_pages,
        }
    }
}

/// A search hit, tagged with the category it was searched in. TMDB payloads do
/// not say whether they are a movie or a show; the `__type` tag is ours and is
/// persisted with cached payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "__type", rename_all = "lowercase")]
pub enum SearchResult {
    Movie(TmdbSearchMovie),
    Show(TmdbSearchShow),
}

impl SearchResult {
    pub fn id(&self) -> i64 {
        match self {
            SearchResult::Movie(m) => m.id,
            SearchResult::Show(s) => s.id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            SearchResult::Movie(_) => MediaKind::Movie,
            SearchResult::Show(_) => MediaKind::Show,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "__type", rename_all = "lowercase")]
pub enum MediaDetails {
    Movie(TmdbMovieDetails),
    Show(TmdbShowDetails),
}

impl MediaDetails {
    pub fn id(&self) -> i64 {
        match self {
            MediaDetails::Movie(m) => m.id,
            MediaDetails::Show(s) => s.id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaDetails::Movie(_) => MediaKind::Movie,
            MediaDetails::Show(_) => MediaKind::Show,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbSearchMovie {
    pub id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    pub original_language: Option<String>,
    pub release_date: Option<String>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub video: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbSearchShow {
    pub id: i64,
    pub name: String,
    pub original_name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    pub original_language: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

// `genres` defaults to empty: a search hit cached under the same id decodes as
// details without genre information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbMovieDetails {
    pub id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    pub release_date: Option<String>,
    pub runtime: Option<i64>,
    pub status: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbShowDetails {
    pub id: i64,
    pub name: String,
    pub original_name: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub number_of_seasons: Option<i64>,
    pub number_of_episodes: Option<i64>,
    pub status: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbConfiguration {
    pub images: TmdbImageConfiguration,
    #[serde(default)]
    pub change_keys: Vec<String>,
}

impl TmdbConfiguration {
    /// Base every image URL is built from (the https variant).
    pub fn image_base_url(&self) -> &str {
        &self.images.secure_base_url
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbImageConfiguration {
    pub base_url: String,
    pub secure_base_url: String,
    #[serde(default)]
    pub backdrop_sizes: Vec<String>,
    #[serde(default)]
    pub logo_sizes: Vec<String>,
    #[serde(default)]
    pub poster_sizes: Vec<String>,
    #[serde(default)]
    pub profile_sizes: Vec<String>,
    #[serde(default)]
    pub still_sizes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbWatchProviderResponse {
    pub id: i64,
    /// Keyed by ISO 3166-1 region code, in the order TMDB sends them
    pub results: IndexMap<String, TmdbRegionWatchProviders>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TmdbRegionWatchProviders {
    pub link: Option<String>,
    pub flatrate: Option<Vec<TmdbWatchProviderDetails>>,
    pub buy: Option<Vec<TmdbWatchProviderDetails>>,
    pub ads: Option<Vec<TmdbWatchProviderDetails>>,
    pub rent: Option<Vec<TmdbWatchProviderDetails>>,
    pub free: Option<Vec<TmdbWatchProviderDetails>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbWatchProviderDetails {
    pub provider_id: i64,
    pub provider_name: String,
    pub logo_path: Option<String>,
    pub display_priority: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbWatchProviderRegionsResponse {
    pub results: Vec<TmdbWatchProviderRegion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbWatchProviderRegion {
    pub iso_3166_1: String,
    pub english_name: Option<String>,
    pub native_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn client_for(server: &MockServer) -> TmdbClient {
        TmdbClient::new(server.uri(), None)
            .unwrap()
            .with_api_key("test-key")
    }

    #[test]
    fn url_joins_base_and_path() {
        let c = TmdbClient::new("https://api.themoviedb.org/3/", None).unwrap();
        assert_eq!(c.url("/configuration"), "https://api.themoviedb.org/3/configuration");
        assert_eq!(c.url("tv/1"), "https://api.themoviedb.org/3/tv/1");
    }

    #[test]
    fn search_result_carries_type_tag() {
        let show = SearchResult::Show(TmdbSearchShow {
            id: 1396,
            name: "Breaking Bad".into(),
            original_name: None,
            overview: None,
            poster_path: Some("/bb.jpg".into()),
            backdrop_path: None,
            genre_ids: vec![18],
            original_language: Some("en".into()),
            first_air_date: None,
            origin_country: vec!["US".into()],
            popularity: None,
            vote_average: None,
            vote_count: None,
        });
        let value = serde_json::to_value(&show).unwrap();
        assert_eq!(value["__type"], "show");
        assert_eq!(value["name"], "Breaking Bad");
    }

    #[test]
    fn cached_search_hit_decodes_as_details_without_genres() {
        let cached = json!({
            "__type": "show",
            "id": 42,
            "name": "The Answer",
            "poster_path": "/answer.jpg",
            "genre_ids": [18],
            "origin_country": ["GB"]
        });
        let details: MediaDetails = serde_json::from_value(cached).unwrap();
        match details {
            MediaDetails::Show(show) => {
                assert_eq!(show.id, 42);
                assert_eq!(show.name, "The Answer");
                assert!(show.genres.is_empty());
            }
            MediaDetails::Movie(_) => panic!("expected a show"),
        }
    }

    #[test]
    fn watch_provider_response_deserialize() {
        let json = r#"{
            "id": 1396,
            "results": {
                "CA": { "link": "https://www.themoviedb.org/tv/1396/watch?locale=CA",
                        "flatrate": [{ "logo_path": "/nf.jpg", "provider_id": 8, "provider_name": "Netflix", "display_priority": 0 }] },
                "US": { "link": "https://www.themoviedb.org/tv/1396/watch?locale=US",
                        "buy": [{ "logo_path": null, "provider_id": 2, "provider_name": "Apple TV", "display_priority": 3 }] }
            }
        }"#;
        let parsed: TmdbWatchProviderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results.len(), 2);
        let us = &parsed.results["US"];
        assert!(us.flatrate.is_none());
        assert_eq!(us.buy.as_ref().unwrap()[0].provider_name, "Apple TV");
        assert_eq!(us.buy.as_ref().unwrap()[0].logo_path, None);
    }

    #[tokio::test]
    async fn get_details_for_show_uses_tv_endpoint_and_tags_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/42"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "name": "The Answer",
                "poster_path": "/answer.jpg",
                "genres": [{ "id": 18, "name": "Drama" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let details = client_for(&server)
            .get_details("42", MediaKind::Show)
            .await
            .unwrap();
        assert_eq!(details.kind(), MediaKind::Show);
        assert_eq!(details.id(), 42);
    }

    #[tokio::test]
    async fn search_passes_query_and_tags_every_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "alien"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [
                    { "id": 348, "title": "Alien", "poster_path": "/alien.jpg" },
                    { "id": 679, "title": "Aliens", "poster_path": null }
                ],
                "total_results": 2,
                "total_pages": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .search(MediaKind::Movie, "alien")
            .await
            .unwrap();
        assert_eq!(response.results.len(), 2);
        assert!(
            response
                .results
                .iter()
                .all(|r| r.kind() == MediaKind::Movie)
        );
        assert_eq!(response.results[1].id(), 679);
    }

    #[tokio::test]
    async fn upstream_failure_names_operation_and_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/7"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_details("7", MediaKind::Show)
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Failed to find show with id 7"), "{message}");
        assert!(matches!(err, TmdbError::Request { .. }));
    }

    #[tokio::test]
    async fn request_errors_never_carry_the_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/configuration"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).get_configuration().await.unwrap_err();
        assert!(matches!(err, TmdbError::Request { .. }));
        assert!(err.to_string().contains("500"), "{err}");
        assert!(!err.to_string().contains("test-key"), "{err}");
        assert!(!format!("{err:?}").contains("test-key"), "{err:?}");
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_configuration().await.unwrap_err();
        assert!(matches!(err, TmdbError::Decode { .. }));
        assert!(err.to_string().contains("configuration"));
    }
}
