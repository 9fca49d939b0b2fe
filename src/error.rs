use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::services::GenerationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Inactive user")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Validation error")]
    Validation(Value),

    #[error("{0}")]
    Conflict(String),

    #[error("Failed to generate content: {0}")]
    Generation(#[from] GenerationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(json!([{ "msg": message.into() }]))
    }

    pub fn post_not_found() -> Self {
        AppError::NotFound("Post not found".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Generation(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, detail) = match &self {
            AppError::Unauthorized => ("UNAUTHORIZED", self.to_string()),
            AppError::Forbidden => ("FORBIDDEN", self.to_string()),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Validation(_) => ("VALIDATION_ERROR", self.to_string()),
            AppError::Conflict(msg) => ("CONFLICT", msg.clone()),
            AppError::Generation(e) => {
                tracing::error!(error = %e, "content generation failed");
                ("GENERATION_FAILED", self.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ("DATABASE_ERROR", "Internal server error".to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        let body = match self {
            AppError::Validation(errors) => json!({
                "detail": detail,
                "code": code,
                "errors": errors,
            }),
            _ => json!({
                "detail": detail,
                "code": code,
            }),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
