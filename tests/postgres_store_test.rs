//! Store tests against a live PostgreSQL instance.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use content_calendar::config::DatabaseConfig;
use content_calendar::db::{Database, PostRepository, Store, UserRepository};
use content_calendar::error::AppError;
use content_calendar::models::{
    NewMediaAttachment, NewPost, NewUser, Platform, PostChanges, PostFilter, PostStatus,
};

async fn connect() -> Database {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::connect(&DatabaseConfig {
        url,
        max_connections: 2,
    })
    .await
    .expect("Failed to connect to PostgreSQL");
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

async fn new_user(db: &Database) -> i64 {
    db.create_user(NewUser {
        email: format!("{}@example.com", uuid::Uuid::new_v4()),
        hashed_password: "not-a-real-hash".to_string(),
        full_name: "Store Test".to_string(),
    })
    .await
    .expect("Failed to create user")
    .id
}

fn draft(content: &str, platform: Platform) -> NewPost {
    NewPost {
        content: content.to_string(),
        platform,
        scheduled_time: None,
        media_attachments: Vec::new(),
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn ping_reports_connected() {
    let db = connect().await;
    assert!(db.ping().await);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn duplicate_email_is_a_conflict() {
    let db = connect().await;
    let email = format!("{}@example.com", uuid::Uuid::new_v4());
    let user = || NewUser {
        email: email.clone(),
        hashed_password: "hash".to_string(),
        full_name: "Dup".to_string(),
    };

    db.create_user(user()).await.expect("first insert");
    let err = db.create_user(user()).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let found = db.find_user_by_email(&email).await.unwrap();
    assert!(found.is_some_and(|u| u.is_active));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn post_lifecycle_is_scoped_to_author() {
    let db = connect().await;
    let author = new_user(&db).await;
    let stranger = new_user(&db).await;

    let mut post = draft("With a picture", Platform::Instagram);
    post.media_attachments.push(NewMediaAttachment {
        url: "https://cdn.example.com/pic.jpg".to_string(),
        media_type: "image".to_string(),
    });
    let created = db.create_post(author, post).await.unwrap();
    assert_eq!(created.post.status, PostStatus::Draft);
    assert_eq!(created.media_attachments.len(), 1);
    assert!(created.analytics.is_none());

    let id = created.post.id;
    assert!(db.find_post(stranger, id).await.unwrap().is_none());
    assert!(db
        .update_post(stranger, id, PostChanges::default())
        .await
        .unwrap()
        .is_none());

    let updated = db
        .update_post(
            author,
            id,
            PostChanges {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("post exists");
    assert_eq!(updated.post.status, PostStatus::Published);
    assert_eq!(updated.post.content, "With a picture");
    assert!(updated.post.updated_at.is_some());

    assert!(db.delete_post(stranger, id).await.unwrap().is_none());
    assert!(db.delete_post(author, id).await.unwrap().is_some());
    assert!(db.find_post(author, id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn list_filters_and_pages_in_id_order() {
    let db = connect().await;
    let author = new_user(&db).await;
    for (content, platform) in [
        ("a", Platform::Twitter),
        ("b", Platform::Linkedin),
        ("c", Platform::Twitter),
    ] {
        db.create_post(author, draft(content, platform)).await.unwrap();
    }

    let twitter = db
        .list_posts(
            author,
            &PostFilter {
                platform: Some(Platform::Twitter),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let contents: Vec<_> = twitter.iter().map(|v| v.post.content.as_str()).collect();
    assert_eq!(contents, vec!["a", "c"]);

    let page = db
        .list_posts(
            author,
            &PostFilter {
                skip: 1,
                limit: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].post.content, "b");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn explicit_none_clears_schedule() {
    let db = connect().await;
    let author = new_user(&db).await;
    let mut post = draft("timed", Platform::Twitter);
    post.scheduled_time = Some(chrono::Utc::now());
    let created = db.create_post(author, post).await.unwrap();

    let kept = db
        .update_post(author, created.post.id, PostChanges::default())
        .await
        .unwrap()
        .expect("post exists");
    assert!(kept.post.scheduled_time.is_some());

    let cleared = db
        .update_post(
            author,
            created.post.id,
            PostChanges {
                scheduled_time: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("post exists");
    assert!(cleared.post.scheduled_time.is_none());
}
