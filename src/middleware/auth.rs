use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::UserInfo;
use crate::services::AuthService;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub email: String,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued at
}

/// The authenticated requester, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub profile: UserInfo,
}

pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let auth_service = AuthService::new(state.store.clone(), state.config.jwt.clone());
    let user = auth_service.resolve_user(bearer.token()).await?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        profile: user.into(),
    });

    Ok(next.run(request).await)
}
