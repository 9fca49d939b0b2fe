// ============================================
// Content Generator
// ============================================
//
// Drafts post copy with a language model: one prompt, one completion,
// the reply split into a primary text and alternative suggestions.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::config::OpenAiConfig;
use crate::models::Platform;

pub const SUGGESTION_SEPARATOR: &str = "|||";
pub const SYSTEM_PROMPT: &str = "You are a social media content expert.";
pub const DEFAULT_TONE: &str = "professional";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Error generating content: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Error generating content: {0}")]
    Upstream(String),
}

// ============================================
// LLM Provider Trait
// ============================================

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Single chat completion with a system and a user message.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError>;

    fn name(&self) -> &str;
}

// ============================================
// OpenAI-compatible Provider
// ============================================

pub struct OpenAiProvider {
    client: HttpClient,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig) -> Self {
        Self {
            client: HttpClient::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream(format!(
                "completion API returned {status}: {body}"
            )));
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::Upstream("completion had no content".to_string()))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ============================================
// Generator
// ============================================

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub platform: Platform,
    pub topic: String,
    pub tone: Option<String>,
    pub length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub content: String,
    pub suggestions: Vec<String>,
}

pub struct ContentGenerator {
    provider: Arc<dyn LlmProvider>,
}

impl ContentGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, GenerationError> {
        let max_length = request
            .length
            .unwrap_or_else(|| request.platform.max_length());
        let tone = request.tone.as_deref().unwrap_or(DEFAULT_TONE);
        let prompt = build_prompt(request.platform, &request.topic, tone, max_length);

        tracing::debug!(
            provider = self.provider.name(),
            platform = %request.platform,
            max_length,
            "requesting completion"
        );

        let reply = self.provider.complete(SYSTEM_PROMPT, &prompt).await?;
        Ok(parse_reply(&reply, max_length))
    }
}

pub fn build_prompt(platform: Platform, topic: &str, tone: &str, max_length: usize) -> String {
    format!(
        "{} about {topic}. The tone should be {tone}. Keep it under {max_length} characters. \
         Generate the main content followed by 2 alternative suggestions, separated by '{SUGGESTION_SEPARATOR}'.",
        platform.prompt_lead()
    )
}

/// Split a completion into primary text and suggestions. The primary text is
/// cut to `max_length` chars without regard for word boundaries.
pub fn parse_reply(reply: &str, max_length: usize) -> GeneratedContent {
    let mut parts = reply.split(SUGGESTION_SEPARATOR);

    let content: String = parts
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .take(max_length)
        .collect();

    let suggestions = parts
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    GeneratedContent {
        content,
        suggestions,
    }
}
