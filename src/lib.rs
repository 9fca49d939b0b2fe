pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod slack;
pub mod telemetry;

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
};

use crate::config::Config;
use crate::db::Store;
use crate::services::{ContentGenerator, Notifier};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    pub generator: Arc<ContentGenerator>,
    pub notifier: Arc<Notifier>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        config: Config,
        generator: ContentGenerator,
        notifier: Notifier,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            generator: Arc::new(generator),
            notifier: Arc::new(notifier),
        }
    }
}

/// The full API router with its cross-cutting layers.
pub fn app(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let router = Router::new()
        .merge(api::health_routes())
        .nest("/api", api::routes(state.clone()))
        .fallback(middleware::not_found)
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .with_state(state);

    middleware::add_tracing(router).layer(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
