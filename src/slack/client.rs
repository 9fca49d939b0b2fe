use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::SlackConfig;

#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    #[error("slack transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("slack api error: {0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Minimal Slack Web API client: the two methods this service calls.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: Client,
    token: String,
    base_url: String,
}

impl SlackClient {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &SlackConfig) -> Self {
        Self::new(&config.bot_token, &config.api_base_url)
    }

    /// `chat.postMessage`; `text` is the notification fallback for the blocks.
    pub async fn post_message(
        &self,
        channel: &str,
        text: &str,
        blocks: Value,
    ) -> Result<(), SlackError> {
        self.call(
            "chat.postMessage",
            json!({
                "channel": channel,
                "text": text,
                "blocks": blocks,
            }),
        )
        .await
    }

    /// `views.publish` for a user's App Home tab.
    pub async fn publish_view(&self, user_id: &str, view: Value) -> Result<(), SlackError> {
        self.call(
            "views.publish",
            json!({
                "user_id": user_id,
                "view": view,
            }),
        )
        .await
    }

    async fn call(&self, method: &str, payload: Value) -> Result<(), SlackError> {
        let url = format!("{}/{}", self.base_url, method);

        let response: SlackResponse = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.ok {
            return Err(SlackError::Api(
                response.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        tracing::debug!(method, "slack call succeeded");
        Ok(())
    }
}
