//! Chat notifications for post lifecycle events.
//!
//! Delivery never fails the caller. Every attempt yields a [`NotifyOutcome`],
//! and failed deliveries are logged on the `dead_letter` target.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::config::SlackConfig;
use crate::models::Post;
use crate::slack::SlackClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    Created,
    Updated,
    Deleted,
    Test,
}

impl PostAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostAction::Created => "created",
            PostAction::Updated => "updated",
            PostAction::Deleted => "deleted",
            PostAction::Test => "test",
        }
    }
}

/// The post fields a notification shows.
#[derive(Debug, Clone)]
pub struct PostNotice {
    pub platform: String,
    pub status: String,
    pub content: String,
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl PostNotice {
    pub fn startup() -> Self {
        Self {
            platform: "system".to_string(),
            status: "test".to_string(),
            content: "API Started".to_string(),
            scheduled_time: None,
        }
    }
}

impl From<&Post> for PostNotice {
    fn from(post: &Post) -> Self {
        Self {
            platform: post.platform.to_string(),
            status: post.status.to_string(),
            content: post.content.clone(),
            scheduled_time: post.scheduled_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Delivered,
    /// No bot token or channel configured.
    Skipped,
    Failed(String),
}

pub struct Notifier {
    client: Option<SlackClient>,
    channel: String,
}

impl Notifier {
    pub fn new(client: SlackClient, channel: impl Into<String>) -> Self {
        Self {
            client: Some(client),
            channel: channel.into(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            client: None,
            channel: String::new(),
        }
    }

    pub fn from_config(config: &SlackConfig) -> Self {
        if config.bot_token.is_empty() || config.channel_id.is_empty() {
            tracing::warn!("slack notifications disabled: bot token or channel not configured");
            return Self::disabled();
        }
        Self::new(SlackClient::from_config(config), &config.channel_id)
    }

    pub async fn notify_post(&self, notice: &PostNotice, action: PostAction) -> NotifyOutcome {
        let title = post_title(action);
        self.deliver(&title, post_blocks(notice, action)).await
    }

    pub async fn notify_error(&self, message: &str, post_id: Option<i64>) -> NotifyOutcome {
        self.deliver(ERROR_TITLE, error_blocks(message, post_id))
            .await
    }

    /// Fire-and-forget variant of [`Notifier::notify_post`].
    pub fn spawn_post(
        self: &Arc<Self>,
        notice: PostNotice,
        action: PostAction,
    ) -> JoinHandle<NotifyOutcome> {
        let notifier = Arc::clone(self);
        tokio::spawn(async move { notifier.notify_post(&notice, action).await })
    }

    /// Fire-and-forget variant of [`Notifier::notify_error`].
    pub fn spawn_error(
        self: &Arc<Self>,
        message: String,
        post_id: Option<i64>,
    ) -> JoinHandle<NotifyOutcome> {
        let notifier = Arc::clone(self);
        tokio::spawn(async move { notifier.notify_error(&message, post_id).await })
    }

    async fn deliver(&self, title: &str, blocks: Value) -> NotifyOutcome {
        let Some(client) = &self.client else {
            return NotifyOutcome::Skipped;
        };

        match client.post_message(&self.channel, title, blocks).await {
            Ok(()) => {
                tracing::debug!(title, channel = %self.channel, "notification delivered");
                NotifyOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(
                    target: "dead_letter",
                    title,
                    channel = %self.channel,
                    error = %e,
                    "notification dropped"
                );
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }
}

const ERROR_TITLE: &str = "❌ Post Error";

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn post_title(action: PostAction) -> String {
    format!("Post {}", capitalize(action.as_str()))
}

pub fn post_blocks(notice: &PostNotice, action: PostAction) -> Value {
    let scheduled = notice
        .scheduled_time
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "Not scheduled".to_string());

    json!([
        {
            "type": "header",
            "text": { "type": "plain_text", "text": post_title(action) }
        },
        {
            "type": "section",
            "fields": [
                { "type": "mrkdwn", "text": format!("*Platform:*\n{}", notice.platform) },
                { "type": "mrkdwn", "text": format!("*Status:*\n{}", notice.status) },
                { "type": "mrkdwn", "text": format!("*Scheduled Time:*\n{scheduled}") }
            ]
        },
        {
            "type": "section",
            "text": { "type": "mrkdwn", "text": format!("*Content:*\n{}", notice.content) }
        }
    ])
}

pub fn error_blocks(message: &str, post_id: Option<i64>) -> Value {
    let mut blocks = vec![
        json!({
            "type": "header",
            "text": { "type": "plain_text", "text": ERROR_TITLE }
        }),
        json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": format!("*Error:*\n{message}") }
        }),
    ];

    if let Some(id) = post_id {
        blocks.push(json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": format!("*Post ID:*\n{id}") }
        }));
    }

    Value::Array(blocks)
}
