mod api;
mod cache;
mod catalog;
mod config;
mod domain;
mod error;
mod storage;
mod tmdb_client;

use std::{path::Path, sync::Arc};

use anyhow::Context;
use cache::CacheAside;
use catalog::Catalog;
use config::Config;
use migration::MigratorTrait;
use poem::{
    EndpointExt, Route, Server,
    listener::TcpListener,
    middleware::{Cors, Tracing as PoemTracing},
};
use poem_openapi::OpenApiService;
use sea_orm::Database;
use storage::sqlite::{SqliteCacheStore, SqlitePreferencesRepo};
use tmdb_client::TmdbClient;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

type CinemusResult<T> = anyhow::Result<T>;

#[tokio::main]
async fn main() -> CinemusResult<()> {
    // Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,reqwest=warn,h2=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting cinemus");

    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let db_conn = Arc::new(
        Database::connect(&config.db_connection_string)
            .await
            .with_context(|| "Failed to connect to database")?,
    );
    migration::Migrator::up(db_conn.as_ref(), None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    let client = TmdbClient::new(&config.tmdb_base_url, config.tmdb_timeout)?
        .with_api_key(&config.tmdb_api_key);
    tracing::info!(
        tmdb_base = %config.tmdb_base_url,
        timeout = ?config.tmdb_timeout,
        "configured TMDB client"
    );

    let max_age = config
        .cache_max_age
        .map(chrono::Duration::from_std)
        .transpose()
        .context("CACHE_MAX_AGE_SECS is out of range")?;
    tracing::info!(max_age_secs = ?config.cache_max_age.map(|d| d.as_secs()), "configured cache");
    let cache = CacheAside::new(Arc::new(SqliteCacheStore::new(Arc::clone(&db_conn)))).with_max_age(max_age);
    let preferences = Arc::new(SqlitePreferencesRepo::new(db_conn));

    let catalog = Catalog::new(client, cache, preferences);
    run_poem(Arc::new(catalog), &config.bind_addr).await
}

pub async fn run_poem(catalog: Arc<Catalog>, bind_addr: &str) -> CinemusResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let api = api::CinemusApi { catalog };
    let api_service = OpenApiService::new(api, "Cinemus API", version).server("http://localhost:3000");
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    let route = Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .with(Cors::new())
        .with(PoemTracing);

    tracing::info!(%bind_addr, "starting HTTP server");
    Server::new(TcpListener::bind(bind_addr)).run(route).await?;
    Ok(())
}
