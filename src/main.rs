mod cache;
mod config;
mod error;
mod handlers;
mod llm;
mod mesh;
mod metrics;
mod models;
mod pipeline;
mod state;
mod store;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

use crate::cache::ModelCache;
use crate::config::Args;
use crate::handlers::{generate_handler, health_handler, metrics_handler, stats_handler};
use crate::llm::LlmClient;
use crate::mesh::repair::RepairOptions;
use crate::state::AppState;
use crate::store::Store;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // parse cli arguments
    let args = Args::parse();

    std::fs::create_dir_all(&args.output_dir).expect("failed to create output directory");
    let store = Arc::new(Store::open(&args.db_path).expect("failed to open database"));

    // creating shared state
    let state = Arc::new(AppState {
        llm: LlmClient::new(
            args.ollama_url.clone(),
            args.model.clone(),
            Duration::from_secs(args.llm_timeout),
        ),
        cache: ModelCache::new(store.clone(), Duration::from_secs(args.cache_ttl)),
        store,
        output_dir: args.output_dir.clone(),
        repair: RepairOptions {
            min_valid_faces: args.min_valid_faces,
            prune_unreferenced: args.prune_unreferenced,
        },
    });

    // creating the router with routes
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/generate", post(generate_handler))
        .route("/stats", get(stats_handler))
        .route("/metrics", get(metrics_handler))
        .nest_service("/generated", ServeDir::new(&args.output_dir))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    info!("server running on http://localhost:{}", args.port);
    info!("generating with {} at {}", args.model, args.ollama_url);
    info!("cache TTL: {} seconds", args.cache_ttl);
    axum::serve(listener, app).await.unwrap();
}
