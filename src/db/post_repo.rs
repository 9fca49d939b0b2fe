use std::collections::HashMap;

use async_trait::async_trait;

use super::{Database, PostRepository};
use crate::error::Result;
use crate::models::{
    MediaAttachment, NewPost, Post, PostAnalytics, PostChanges, PostFilter, PostStatus, PostView,
};

const POST_COLUMNS: &str = "id, content, platform, status, scheduled_time, published_time, \
                            created_at, updated_at, author_id";

impl Database {
    /// Attach media and analytics rows to a page of posts with two queries.
    async fn load_views(&self, posts: Vec<Post>) -> Result<Vec<PostView>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

        let attachments = sqlx::query_as::<_, MediaAttachment>(
            r#"
            SELECT id, url, type, created_at, post_id
            FROM media_attachments
            WHERE post_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pg)
        .await?;

        let analytics = sqlx::query_as::<_, PostAnalytics>(
            r#"
            SELECT id, likes, shares, comments, impressions, updated_at, post_id
            FROM post_analytics
            WHERE post_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pg)
        .await?;

        let mut attachments_by_post: HashMap<i64, Vec<MediaAttachment>> = HashMap::new();
        for attachment in attachments {
            attachments_by_post
                .entry(attachment.post_id)
                .or_default()
                .push(attachment);
        }

        let mut analytics_by_post: HashMap<i64, PostAnalytics> = analytics
            .into_iter()
            .map(|a| (a.post_id, a))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                media_attachments: attachments_by_post.remove(&post.id).unwrap_or_default(),
                analytics: analytics_by_post.remove(&post.id),
                post,
            })
            .collect())
    }

    async fn load_view(&self, post: Post) -> Result<PostView> {
        let mut views = self.load_views(vec![post]).await?;
        // load_views maps one-to-one
        Ok(views.remove(0))
    }
}

#[async_trait]
impl PostRepository for Database {
    async fn create_post(&self, author_id: i64, new_post: NewPost) -> Result<PostView> {
        let mut tx = self.pg.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO posts (content, platform, status, scheduled_time, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {POST_COLUMNS}
            "#
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(&new_post.content)
            .bind(new_post.platform)
            .bind(PostStatus::Draft)
            .bind(new_post.scheduled_time)
            .bind(author_id)
            .fetch_one(&mut *tx)
            .await?;

        let mut media_attachments = Vec::with_capacity(new_post.media_attachments.len());
        for attachment in &new_post.media_attachments {
            let row = sqlx::query_as::<_, MediaAttachment>(
                r#"
                INSERT INTO media_attachments (url, type, post_id)
                VALUES ($1, $2, $3)
                RETURNING id, url, type, created_at, post_id
                "#,
            )
            .bind(&attachment.url)
            .bind(&attachment.media_type)
            .bind(post.id)
            .fetch_one(&mut *tx)
            .await?;
            media_attachments.push(row);
        }

        tx.commit().await?;

        Ok(PostView {
            post,
            media_attachments,
            analytics: None,
        })
    }

    async fn list_posts(&self, author_id: i64, filter: &PostFilter) -> Result<Vec<PostView>> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE author_id = $1
              AND ($2::varchar IS NULL OR platform = $2)
              AND ($3::varchar IS NULL OR status = $3)
            ORDER BY id
            LIMIT $4 OFFSET $5
            "#
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(author_id)
            .bind(filter.platform)
            .bind(filter.status)
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&self.pg)
            .await?;

        self.load_views(posts).await
    }

    async fn find_post(&self, author_id: i64, post_id: i64) -> Result<Option<PostView>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1 AND author_id = $2");
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .bind(author_id)
            .fetch_optional(&self.pg)
            .await?;

        match post {
            Some(post) => Ok(Some(self.load_view(post).await?)),
            None => Ok(None),
        }
    }

    async fn update_post(
        &self,
        author_id: i64,
        post_id: i64,
        changes: PostChanges,
    ) -> Result<Option<PostView>> {
        let sql = format!(
            r#"
            UPDATE posts
            SET content = COALESCE($3, content),
                platform = COALESCE($4, platform),
                scheduled_time = CASE WHEN $5 THEN $6 ELSE scheduled_time END,
                status = COALESCE($7, status),
                updated_at = NOW()
            WHERE id = $1 AND author_id = $2
            RETURNING {POST_COLUMNS}
            "#
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .bind(author_id)
            .bind(changes.content)
            .bind(changes.platform)
            .bind(changes.scheduled_time.is_some())
            .bind(changes.scheduled_time.flatten())
            .bind(changes.status)
            .fetch_optional(&self.pg)
            .await?;

        match post {
            Some(post) => Ok(Some(self.load_view(post).await?)),
            None => Ok(None),
        }
    }

    async fn delete_post(&self, author_id: i64, post_id: i64) -> Result<Option<Post>> {
        let sql = format!(
            "DELETE FROM posts WHERE id = $1 AND author_id = $2 RETURNING {POST_COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .bind(author_id)
            .fetch_optional(&self.pg)
            .await?;
        Ok(post)
    }
}
