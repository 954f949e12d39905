#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the flood map application.
//!
//! Serves the raw snapshot and the materialized dashboard view (filtered
//! map primitives + sidebar cards) to the Leaflet frontend, and drives the
//! fixed-interval background refresh. All shared state lives in
//! [`AppState`]; there are no module-global mutables.

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use flood_map_loader::{SnapshotLoader, SnapshotState};
use flood_map_render::FilterEngine;

/// Default upstream refresh interval: 5 minutes.
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Shared application state.
pub struct AppState {
    /// Snapshot loader (shared with the background refresh task).
    pub loader: Arc<SnapshotLoader>,
    /// Filter engine applied to view requests.
    pub engine: FilterEngine,
}

/// Starts the flood map API server.
///
/// Builds the snapshot loader, performs an initial fetch (falling back to
/// the embedded dataset if the upstream service is down), spawns the
/// fixed-interval refresh task, and starts the Actix-Web HTTP server.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the HTTP client for the loader cannot be built.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let upstream_url = std::env::var("UPSTREAM_URL")
        .unwrap_or_else(|_| "http://dados.apac.pe.gov.br:41120/previsao/".to_string());
    let refresh_secs: u64 = std::env::var("REFRESH_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);

    let snapshot_state = Arc::new(SnapshotState::new());
    let loader = Arc::new(
        SnapshotLoader::new(upstream_url, snapshot_state)
            .expect("Failed to build HTTP client for snapshot loader"),
    );

    log::info!("Fetching initial snapshot...");
    if let Err(e) = loader.refresh().await {
        log::error!("Initial snapshot fetch failed: {e}");
    }

    // Fixed-interval refresh; the only thing that ever retries silently.
    let refresh_loader = Arc::clone(&loader);
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(refresh_secs));
        interval.tick().await; // first tick fires immediately, skip it
        loop {
            interval.tick().await;
            if let Err(e) = refresh_loader.refresh().await {
                log::error!("Scheduled refresh failed: {e}");
            }
        }
    });

    let state = web::Data::new(AppState {
        loader,
        engine: FilterEngine::new(),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/previsao", web::get().to(handlers::previsao))
                    .route("/view", web::get().to(handlers::view))
                    .route("/focus", web::get().to(handlers::focus))
                    .route("/refresh", web::post().to(handlers::refresh)),
            )
            // Serve frontend static files
            .service(Files::new("/", "static").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
