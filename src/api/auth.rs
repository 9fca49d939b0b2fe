use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::extract::ValidatedJson;
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::UserInfo;
use crate::services::AuthService;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes that sit behind `require_auth`.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_current_user))
        .route("/auth/logout", post(logout))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserInfo,
}

impl TokenResponse {
    fn bearer(access_token: String, user: UserInfo) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<Json<TokenResponse>> {
    let auth_service = AuthService::new(state.store.clone(), state.config.jwt.clone());
    let (user, access_token) = auth_service
        .register(&payload.email, &payload.password, &payload.full_name)
        .await?;

    Ok(Json(TokenResponse::bearer(access_token, user.into())))
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let auth_service = AuthService::new(state.store.clone(), state.config.jwt.clone());
    let (user, access_token) = auth_service
        .authenticate(&payload.email, &payload.password)
        .await?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(TokenResponse::bearer(access_token, user.into())))
}

/// Tokens are stateless; logging out is left to the client.
async fn logout(Extension(current_user): Extension<CurrentUser>) -> Json<serde_json::Value> {
    tracing::info!(user_id = current_user.id, "user logged out");
    Json(serde_json::json!({ "message": "Logged out successfully" }))
}

async fn get_current_user(Extension(current_user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user: current_user.profile,
    })
}
