mod ai;
mod auth;
mod extract;
mod health;
mod posts;


use axum::{middleware::from_fn_with_state, Router};

use crate::middleware::require_auth;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/posts", posts::routes())
        .nest("/ai", ai::routes())
        .merge(auth::protected_routes())
        .route_layer(from_fn_with_state(state, require_auth));

    Router::new()
        .nest("/auth", auth::routes())
        .merge(protected)
}

pub fn health_routes() -> Router<AppState> {
    health::routes()
}
