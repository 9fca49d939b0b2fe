use std::sync::Arc;

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{NewPost, PostChanges, PostFilter, PostView};
use crate::services::notifier::{Notifier, PostAction, PostNotice};

/// Post CRUD scoped to a single author. Each mutation is announced on the
/// notification channel without waiting for delivery.
pub struct PostService {
    store: Arc<dyn Store>,
    notifier: Arc<Notifier>,
}

impl PostService {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn create(&self, author_id: i64, post: NewPost) -> Result<PostView> {
        let view = self.store.create_post(author_id, post).await?;
        tracing::info!(post_id = view.post.id, author_id, "post created");

        self.notifier
            .spawn_post(PostNotice::from(&view.post), PostAction::Created);
        Ok(view)
    }

    pub async fn list(&self, author_id: i64, filter: &PostFilter) -> Result<Vec<PostView>> {
        self.store.list_posts(author_id, filter).await
    }

    pub async fn get(&self, author_id: i64, post_id: i64) -> Result<PostView> {
        self.store
            .find_post(author_id, post_id)
            .await?
            .ok_or_else(AppError::post_not_found)
    }

    pub async fn update(
        &self,
        author_id: i64,
        post_id: i64,
        changes: PostChanges,
    ) -> Result<PostView> {
        let view = self
            .store
            .update_post(author_id, post_id, changes)
            .await?
            .ok_or_else(AppError::post_not_found)?;
        tracing::info!(post_id, author_id, status = %view.post.status, "post updated");

        self.notifier
            .spawn_post(PostNotice::from(&view.post), PostAction::Updated);
        Ok(view)
    }

    pub async fn delete(&self, author_id: i64, post_id: i64) -> Result<()> {
        let post = self
            .store
            .delete_post(author_id, post_id)
            .await?
            .ok_or_else(AppError::post_not_found)?;
        tracing::info!(post_id, author_id, "post deleted");

        self.notifier
            .spawn_post(PostNotice::from(&post), PostAction::Deleted);
        Ok(())
    }
}
