//! In-process `Store` used by handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{PostRepository, Store, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{
    MediaAttachment, NewPost, NewUser, Post, PostAnalytics, PostChanges, PostFilter, PostStatus,
    PostView, User,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    attachments: Vec<MediaAttachment>,
    analytics: Vec<PostAnalytics>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn view(&self, post: &Post) -> PostView {
        PostView {
            post: post.clone(),
            media_attachments: self
                .attachments
                .iter()
                .filter(|a| a.post_id == post.id)
                .cloned()
                .collect(),
            analytics: self.analytics.iter().find(|a| a.post_id == post.id).cloned(),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user_active(&self, user_id: i64, active: bool) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.is_active = active;
        }
    }

    pub fn insert_analytics(&self, post_id: i64, likes: i32) {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.analytics.push(PostAnalytics {
            id,
            likes,
            shares: 0,
            comments: 0,
            impressions: 0,
            updated_at: None,
            post_id,
        });
    }

    pub fn post_count(&self) -> usize {
        self.tables.lock().unwrap().posts.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        let id = tables.next_id();
        let user = User {
            id,
            email: user.email,
            hashed_password: user.hashed_password,
            full_name: user.full_name,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, author_id: i64, new_post: NewPost) -> Result<PostView> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let post = Post {
            id,
            content: new_post.content,
            platform: new_post.platform,
            status: PostStatus::Draft,
            scheduled_time: new_post.scheduled_time,
            published_time: None,
            created_at: Utc::now(),
            updated_at: None,
            author_id,
        };
        for attachment in new_post.media_attachments {
            let attachment_id = tables.next_id();
            tables.attachments.push(MediaAttachment {
                id: attachment_id,
                url: attachment.url,
                media_type: attachment.media_type,
                created_at: Utc::now(),
                post_id: id,
            });
        }
        tables.posts.push(post.clone());
        Ok(tables.view(&post))
    }

    async fn list_posts(&self, author_id: i64, filter: &PostFilter) -> Result<Vec<PostView>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .filter(|p| filter.platform.map_or(true, |platform| p.platform == platform))
            .filter(|p| filter.status.map_or(true, |status| p.status == status))
            .skip(filter.skip as usize)
            .take(filter.limit as usize)
            .map(|p| tables.view(p))
            .collect())
    }

    async fn find_post(&self, author_id: i64, post_id: i64) -> Result<Option<PostView>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == post_id && p.author_id == author_id)
            .map(|p| tables.view(p)))
    }

    async fn update_post(
        &self,
        author_id: i64,
        post_id: i64,
        changes: PostChanges,
    ) -> Result<Option<PostView>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(post) = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post_id && p.author_id == author_id)
        else {
            return Ok(None);
        };

        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(platform) = changes.platform {
            post.platform = platform;
        }
        if let Some(scheduled_time) = changes.scheduled_time {
            post.scheduled_time = scheduled_time;
        }
        if let Some(status) = changes.status {
            post.status = status;
        }
        post.updated_at = Some(Utc::now());

        let post = post.clone();
        Ok(Some(tables.view(&post)))
    }

    async fn delete_post(&self, author_id: i64, post_id: i64) -> Result<Option<Post>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(index) = tables
            .posts
            .iter()
            .position(|p| p.id == post_id && p.author_id == author_id)
        else {
            return Ok(None);
        };

        let post = tables.posts.remove(index);
        tables.attachments.retain(|a| a.post_id != post_id);
        tables.analytics.retain(|a| a.post_id != post_id);
        Ok(Some(post))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> bool {
        true
    }
}
