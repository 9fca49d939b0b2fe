use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use validator::Validate;

use super::extract::{parse_id, ValidatedJson, ValidatedQuery};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{
    NewMediaAttachment, NewPost, Platform, PostChanges, PostFilter, PostStatus, PostView,
};
use crate::services::PostService;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
}

fn post_service(state: &AppState) -> PostService {
    PostService::new(state.store.clone(), state.notifier.clone())
}

#[derive(Debug, Deserialize, Validate)]
pub struct AttachmentRequest {
    #[validate(url)]
    pub url: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub media_type: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1))]
    pub content: String,
    pub platform: Platform,
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(nested)]
    pub media_attachments: Vec<AttachmentRequest>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub platform: Option<Platform>,
    /// Absent keeps the schedule, `null` clears it.
    #[serde(default, deserialize_with = "present")]
    pub scheduled_time: Option<Option<DateTime<Utc>>>,
    pub status: Option<PostStatus>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListPostsQuery {
    pub platform: Option<Platform>,
    pub status: Option<PostStatus>,
    #[validate(range(min = 0))]
    pub skip: Option<i64>,
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<i64>,
}

async fn create_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> Result<Json<PostView>> {
    let new_post = NewPost {
        content: payload.content,
        platform: payload.platform,
        scheduled_time: payload.scheduled_time,
        media_attachments: payload
            .media_attachments
            .into_iter()
            .map(|a| NewMediaAttachment {
                url: a.url,
                media_type: a.media_type,
            })
            .collect(),
    };

    let view = post_service(&state).create(current_user.id, new_post).await?;
    Ok(Json(view))
}

async fn list_posts(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<ListPostsQuery>,
) -> Result<Json<Vec<PostView>>> {
    let defaults = PostFilter::default();
    let filter = PostFilter {
        platform: query.platform,
        status: query.status,
        skip: query.skip.unwrap_or(defaults.skip),
        limit: query.limit.unwrap_or(defaults.limit),
    };

    let posts = post_service(&state).list(current_user.id, &filter).await?;
    Ok(Json(posts))
}

async fn get_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<PostView>> {
    let post_id = parse_id(&id, "post_id")?;
    let view = post_service(&state).get(current_user.id, post_id).await?;
    Ok(Json(view))
}

async fn update_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<PostView>> {
    let post_id = parse_id(&id, "post_id")?;
    let changes = PostChanges {
        content: payload.content,
        platform: payload.platform,
        scheduled_time: payload.scheduled_time,
        status: payload.status,
    };

    let view = post_service(&state)
        .update(current_user.id, post_id, changes)
        .await?;
    Ok(Json(view))
}

async fn delete_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let post_id = parse_id(&id, "post_id")?;
    post_service(&state).delete(current_user.id, post_id).await?;
    Ok(Json(serde_json::json!({ "message": "Post deleted successfully" })))
}
