use std::time::Instant;

use super::Catalog;
use crate::{
    domain::{
        mapping::{map_detail_result, map_search_results},
        models::{Media, MediaKind, MediaList},
    },
    error::CatalogResult,
    storage::CacheKind,
    tmdb_client::{MediaDetails, SearchResponse, SearchResult},
};

impl Catalog {
    /// Details for one movie or show, with its watch providers attached.
    /// `region` narrows the watch providers to a single region.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_media(&self, id: &str, kind: MediaKind, region: Option<&str>) -> CatalogResult<Media> {
        let started = Instant::now();
        let configuration = self.configuration().await?;
        let watch_providers = self
            .get_watch_providers(id, kind, &configuration, region)
            .await?;

        let details: MediaDetails = self
            .cache
            .read_through(id, CacheKind::media(kind), || self.client.get_details(id, kind))
            .await?;

        let media = map_detail_result(&details, &configuration, Some(watch_providers));
        tracing::debug!(
            id = details.id(),
            kind = %details.kind(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "resolved media"
        );
        Ok(media)
    }

    /// Search one category. Each hit is also cached under its own id so a
    /// following detail lookup can be served without going upstream.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search_media(&self, kind: MediaKind, query: &str) -> CatalogResult<MediaList> {
        let started = Instant::now();
        let configuration = self.configuration().await?;
        let key = format!("{}:{}", kind.upstream_category(), query);

        let response: SearchResponse<SearchResult> = self
            .cache
            .read_through(&key, CacheKind::search(kind), || {
                self.client.search(kind, query)
            })
            .await?;

        // Refreshed on every search, cached or not. Detached; the search does not wait on them.
        for result in &response.results {
            let _ = self.cache.spawn_put(
                &result.id().to_string(),
                CacheKind::media(result.kind()),
                result,
            );
        }

        let media = map_search_results(&response.results, &configuration);
        tracing::debug!(
            %kind,
            query,
            results = media.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "resolved search"
        );
        Ok(media)
    }

    pub async fn get_show(&self, id: &str) -> CatalogResult<Media> {
        self.get_media(id, MediaKind::Show, None).await
    }

    pub async fn get_movie(&self, id: &str) -> CatalogResult<Media> {
        self.get_media(id, MediaKind::Movie, None).await
    }

    pub async fn search_shows(&self, query: &str) -> CatalogResult<MediaList> {
        self.search_media(MediaKind::Show, query).await
    }

    pub async fn search_movies(&self, query: &str) -> CatalogResult<MediaList> {
        self.search_media(MediaKind::Movie, query).await
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        cache::tests::settle,
        catalog::{
            CONFIGURATION_CACHE_KEY,
            tests::{catalog_for, configuration_body},
        },
        domain::models::{ImageSize, MediaKind},
        error::{CatalogError, TmdbError},
        storage::{CacheEntry, CacheKind, CacheStore},
    };
    use chrono::Utc;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    async fn mount_configuration(server: &MockServer, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/configuration"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(configuration_body()))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn get_show_cold_cache_fetches_each_resource_once() {
        let server = MockServer::start().await;
        mount_configuration(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/tv/42/watch/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "results": {
                    "US": { "flatrate": [{ "provider_id": 8, "provider_name": "Netflix", "logo_path": "/nf.jpg" }] }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "name": "The Answer",
                "poster_path": "/answer.jpg",
                "genres": [{ "id": 18, "name": "Drama" }, { "id": 35, "name": "Comedy" }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let (catalog, store) = catalog_for(&server).await;

        let media = catalog.get_show("42").await.unwrap();
        assert_eq!(media.id, 42);
        assert_eq!(media.kind, MediaKind::Show);
        assert_eq!(media.title, "The Answer");
        assert_eq!(media.genres, vec!["Drama", "Comedy"]);
        assert_eq!(
            media.images.poster[&ImageSize::Small],
            "https://image.tmdb.org/t/p/w300/answer.jpg"
        );
        let providers = media.watch_providers.as_ref().unwrap();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].flatrate.as_ref().unwrap()[0].name, "Netflix");

        // Warm cache: same answer, no further upstream calls (checked by `expect(1)` on drop).
        settle(store.as_ref(), CONFIGURATION_CACHE_KEY, CacheKind::Configuration).await;
        settle(store.as_ref(), "42", CacheKind::ShowWatchProviders).await;
        settle(store.as_ref(), "42", CacheKind::Show).await;
        let again = catalog.get_show("42").await.unwrap();
        assert_eq!(again, media);
    }

    #[tokio::test]
    async fn search_caches_each_hit_for_later_lookups() {
        let server = MockServer::start().await;
        mount_configuration(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/search/tv"))
            .and(query_param("query", "breaking"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [
                    { "id": 1396, "name": "Breaking Bad", "poster_path": "/bb.jpg", "genre_ids": [18] },
                    { "id": 60059, "name": "Better Call Saul", "poster_path": null, "genre_ids": [80] }
                ],
                "total_results": 2,
                "total_pages": 1
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/1396"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/1396/watch/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1396, "results": {} })))
            .expect(1)
            .mount(&server)
            .await;
        let (catalog, store) = catalog_for(&server).await;

        let results = catalog.search_shows("breaking").await.unwrap();
        let titles: Vec<&str> = results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Breaking Bad", "Better Call Saul"]);
        assert!(results.iter().all(|m| m.genres.is_empty()));
        assert!(results[1].images.poster.is_empty());

        settle(store.as_ref(), CONFIGURATION_CACHE_KEY, CacheKind::Configuration).await;
        settle(store.as_ref(), "1396", CacheKind::Show).await;
        settle(store.as_ref(), "60059", CacheKind::Show).await;
        settle(store.as_ref(), "tv:breaking", CacheKind::ShowSearch).await;

        let show = catalog.get_show("1396").await.unwrap();
        assert_eq!(show.title, "Breaking Bad");
        assert_eq!(show.watch_providers, Some(vec![]));

        let again = catalog.search_shows("breaking").await.unwrap();
        assert_eq!(again, results);
    }

    #[tokio::test]
    async fn cached_search_still_refreshes_each_hit() {
        let server = MockServer::start().await;
        mount_configuration(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/search/tv"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        let (catalog, store) = catalog_for(&server).await;
        store
            .put(CacheEntry {
                key: "tv:dark".into(),
                kind: CacheKind::ShowSearch,
                data: json!({
                    "page": 1,
                    "results": [{ "__type": "show", "id": 70523, "name": "Dark", "poster_path": "/dark.jpg" }],
                    "total_results": 1,
                    "total_pages": 1
                }),
                stored_at: Utc::now(),
            })
            .await
            .unwrap();
        assert!(store.get("70523", Some(CacheKind::Show)).await.unwrap().is_none());

        let results = catalog.search_shows("dark").await.unwrap();
        assert_eq!(results[0].title, "Dark");

        settle(store.as_ref(), "70523", CacheKind::Show).await;
        let item = store.get("70523", Some(CacheKind::Show)).await.unwrap().unwrap();
        assert_eq!(item.data["name"], "Dark");
    }

    #[tokio::test]
    async fn movie_and_show_with_same_id_do_not_collide() {
        let server = MockServer::start().await;
        mount_configuration(&server, 1).await;
        for (category, body) in [
            ("movie", json!({ "id": 11, "title": "Star Wars", "genres": [] })),
            ("tv", json!({ "id": 11, "name": "Highlander", "genres": [] })),
        ] {
            Mock::given(method("GET"))
                .and(path(format!("/{category}/11")))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path(format!("/{category}/11/watch/providers")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 11, "results": {} })))
                .expect(1)
                .mount(&server)
                .await;
        }
        let (catalog, store) = catalog_for(&server).await;

        let movie = catalog.get_movie("11").await.unwrap();
        settle(store.as_ref(), CONFIGURATION_CACHE_KEY, CacheKind::Configuration).await;
        settle(store.as_ref(), "11", CacheKind::Movie).await;
        let show = catalog.get_show("11").await.unwrap();

        assert_eq!((movie.kind, movie.title.as_str()), (MediaKind::Movie, "Star Wars"));
        assert_eq!((show.kind, show.title.as_str()), (MediaKind::Show, "Highlander"));
    }

    #[tokio::test]
    async fn upstream_failure_fails_the_whole_operation() {
        let server = MockServer::start().await;
        mount_configuration(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/tv/99/watch/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 99, "results": {} })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/99"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let (catalog, _) = catalog_for(&server).await;

        let err = catalog.get_show("99").await.unwrap_err();
        assert!(matches!(err, CatalogError::Upstream(TmdbError::Request { .. })));
        assert!(err.to_string().contains("Failed to find show with id 99"), "{err}");
    }
}
