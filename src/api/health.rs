use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Social Media Content Calendar API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy",
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = if state.store.ping().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(json!({
        "status": "healthy",
        "database": database,
    }))
}
