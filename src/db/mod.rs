mod post_repo;
mod user_repo;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::models::{NewPost, NewUser, Post, PostChanges, PostFilter, PostView, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `AppError::Conflict` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;
}

/// Post storage. Every lookup is scoped by author: a post owned by someone
/// else is indistinguishable from a missing one.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, author_id: i64, post: NewPost) -> Result<PostView>;

    async fn list_posts(&self, author_id: i64, filter: &PostFilter) -> Result<Vec<PostView>>;

    async fn find_post(&self, author_id: i64, post_id: i64) -> Result<Option<PostView>>;

    async fn update_post(
        &self,
        author_id: i64,
        post_id: i64,
        changes: PostChanges,
    ) -> Result<Option<PostView>>;

    /// Hard delete; attachments and analytics go with the post.
    async fn delete_post(&self, author_id: i64, post_id: i64) -> Result<Option<Post>>;
}

#[async_trait]
pub trait Store: UserRepository + PostRepository {
    async fn ping(&self) -> bool;
}

#[derive(Clone)]
pub struct Database {
    pub pg: PgPool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pg = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");

        Ok(Self { pg })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pg).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl Store for Database {
    async fn ping(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pg).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "database ping failed");
                false
            }
        }
    }
}
