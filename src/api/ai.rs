use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::Deserialize;
use validator::Validate;

use super::extract::ValidatedJson;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Platform;
use crate::services::{GeneratedContent, GenerationRequest};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/generate", post(generate_content))
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateContentRequest {
    pub platform: Platform,
    #[validate(length(min = 1, max = 500))]
    pub topic: String,
    #[validate(length(min = 1, max = 50))]
    pub tone: Option<String>,
    #[validate(range(min = 1))]
    pub length: Option<usize>,
}

async fn generate_content(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<GenerateContentRequest>,
) -> Result<Json<GeneratedContent>> {
    let request = GenerationRequest {
        platform: payload.platform,
        topic: payload.topic,
        tone: payload.tone,
        length: payload.length,
    };

    match state.generator.generate(&request).await {
        Ok(generated) => {
            tracing::info!(
                user_id = current_user.id,
                platform = %request.platform,
                suggestions = generated.suggestions.len(),
                "content generated"
            );
            Ok(Json(generated))
        }
        Err(e) => {
            state.notifier.spawn_error(e.to_string(), None);
            Err(AppError::from(e))
        }
    }
}
