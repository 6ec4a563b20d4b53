#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod aggregate;
mod cache;
mod config;
mod error;
mod fetch;
mod menu;
mod parse;
mod routes;

use std::{sync::Arc, time::Instant};

use axum::{
    http::Method,
    routing::{get, on, MethodFilter},
    Extension, Router,
};

use crate::{
    aggregate::Aggregator,
    cache::{DayCache, Store},
    config::{Config, KEEP_ALIVE_INTERVAL},
    fetch::make_client,
    menu::MenuResult,
    routes::AppState,
};
use juniper::{graphql_object, EmptyMutation, EmptySubscription, RootNode};
use juniper_axum::{graphiql, graphql};
use tokio::{net::TcpListener, time::interval};
use tower_http::cors::CorsLayer;
use tower_http::{compression::CompressionLayer, cors::Any};

pub use error::{Error, Result};

#[derive(Clone, Debug)]
pub struct Query(Arc<Aggregator>);

#[graphql_object]
impl Query {
    /// Today's menus in configuration order, only the listed sources when `ids` is given.
    async fn menus(&self, ids: Option<Vec<String>>) -> Vec<MenuResult> {
        self.0.menus(ids.as_deref()).await
    }
}

type Schema = RootNode<'static, Query, EmptyMutation, EmptySubscription>;

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn app(aggregator: Arc<Aggregator>) -> Router {
    let schema = Schema::new(
        Query(Arc::clone(&aggregator)),
        EmptyMutation::new(),
        EmptySubscription::new(),
    );
    let compression_layer: CompressionLayer = CompressionLayer::new()
        .br(true)
        .deflate(true)
        .gzip(true)
        .zstd(true);
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST]) // intentionally excludes request-refresh/PUT
        .allow_origin(Any);

    routes::router(AppState::new(aggregator))
        .route(
            "/graphql",
            on(
                MethodFilter::GET.or(MethodFilter::POST),
                graphql::<Arc<Schema>>,
            ),
        )
        .route("/graphiql", get(graphiql("/graphql", None::<&str>)))
        .layer(cors_layer)
        .layer(Extension(Arc::new(schema)))
        .layer(compression_layer)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("could not listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();
    pretty_env_logger::init();
    if let Ok(path) = dotenv {
        log::info!("loaded environment from {}", path.display());
    }

    let config = Config::from_env()?;
    let store = Store::open(&config.cache).await?;
    log::info!("{store:?}");
    let client = make_client(config.fetch_timeout)?;
    let aggregator = Arc::new(Aggregator::new(
        config.sources,
        client.clone(),
        DayCache::new(store),
    ));
    log::info!("serving {} sources", aggregator.sources().len());

    let addr = config.addr;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("failed to listen on {addr}: {e}"))?;
    log::info!("listening on http://{addr}");

    let warm = Arc::clone(&aggregator);
    tokio::spawn(async move {
        log::info!("Warming up menu cache");
        let start = Instant::now();
        let menus = warm.all_menus().await;
        log::info!("Warmed up {} menus, took {:?}", menus.len(), start.elapsed());
    });

    if let Some(url) = config.keep_alive {
        tokio::spawn(async move {
            let mut ticks = interval(KEEP_ALIVE_INTERVAL);
            ticks.tick().await;
            loop {
                ticks.tick().await;
                match client.get(url.clone()).send().await {
                    Ok(res) => log::debug!("keep-alive ping to {url}: {}", res.status()),
                    Err(e) => log::warn!("keep-alive ping to {url} failed: {e}"),
                }
            }
        });
    }

    axum::serve(listener, app(aggregator))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::{
        aggregate::Clock,
        config::{CacheLocation, Source},
        parse::{sites::fixtures, Extractor},
    };

    async fn aggregator() -> Arc<Aggregator> {
        let url = Url::parse("http://127.0.0.1:1/menu").unwrap();
        let sources = vec![
            Source::new("klondyke", "Klondyke", url.clone(), Extractor::Klondyke),
            Source::new("tokumaru", "Tokumaru", url, Extractor::Tokumaru),
        ];
        let store = Store::open(&CacheLocation::Memory).await.unwrap();
        Arc::new(
            Aggregator::new(
                sources,
                make_client(Duration::from_secs(5)).unwrap(),
                DayCache::new(store),
            )
            .with_clock(Clock::Fixed(fixtures::date(2026, 10, 13))),
        )
    }

    #[tokio::test]
    async fn test_graphql_menus_filter() {
        let app = app(aggregator().await);
        let query = r#"{"query": "{ menus(ids: [\"tokumaru\"]) { sourceId displayName content plain } }"}"#;
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/graphql")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(query))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let menus = json["data"]["menus"].as_array().unwrap();
        assert_eq!(menus.len(), 1);
        assert_eq!(menus[0]["sourceId"], "tokumaru");
        assert_eq!(menus[0]["displayName"], "Tokumaru");
        let plain = menus[0]["plain"].as_str().unwrap();
        assert!(plain.starts_with("Failed to fetch the menu: "));
        assert!(menus[0]["content"]
            .as_str()
            .unwrap()
            .starts_with("Failed to fetch the menu: "));
    }

    #[tokio::test]
    async fn test_graphiql_page() {
        let app = app(aggregator().await);
        let response = app
            .oneshot(Request::builder().uri("/graphiql").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
