use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Target social network of a post. Shared by the database layer and the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Linkedin,
    Instagram,
    Facebook,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
        }
    }

    /// Character limit used when a generation request gives none.
    pub fn max_length(&self) -> usize {
        match self {
            Platform::Twitter => 280,
            Platform::Linkedin => 3000,
            Platform::Instagram => 2200,
            Platform::Facebook => 63206,
        }
    }

    /// Opening instruction of the generation prompt.
    pub fn prompt_lead(&self) -> &'static str {
        match self {
            Platform::Twitter => "Create a concise and engaging tweet",
            Platform::Linkedin => "Write a professional LinkedIn post",
            Platform::Instagram => "Create an engaging Instagram caption",
            Platform::Facebook => "Write an engaging Facebook post",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a post. Transitions are not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Scheduled,
    Published,
    Failed,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
            PostStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub platform: Platform,
    pub status: PostStatus,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub published_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author_id: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub id: i64,
    pub url: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub media_type: String,
    pub created_at: DateTime<Utc>,
    pub post_id: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PostAnalytics {
    pub id: i64,
    pub likes: i32,
    pub shares: i32,
    pub comments: i32,
    pub impressions: i32,
    pub updated_at: Option<DateTime<Utc>>,
    pub post_id: i64,
}

/// A post together with its attachments and analytics, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub media_attachments: Vec<MediaAttachment>,
    pub analytics: Option<PostAnalytics>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMediaAttachment {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub content: String,
    pub platform: Platform,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub media_attachments: Vec<NewMediaAttachment>,
}

/// Partial update; `None` leaves the stored value untouched.
/// `scheduled_time: Some(None)` clears the schedule.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub content: Option<String>,
    pub platform: Option<Platform>,
    pub scheduled_time: Option<Option<DateTime<Utc>>>,
    pub status: Option<PostStatus>,
}

#[derive(Debug, Clone)]
pub struct PostFilter {
    pub platform: Option<Platform>,
    pub status: Option<PostStatus>,
    pub skip: i64,
    pub limit: i64,
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            platform: None,
            status: None,
            skip: 0,
            limit: 100,
        }
    }
}
