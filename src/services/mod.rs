pub mod auth_service;
pub mod content_generator;
pub mod notifier;
pub mod post_service;

pub use auth_service::AuthService;
pub use content_generator::{
    ContentGenerator, GeneratedContent, GenerationError, GenerationRequest, LlmProvider,
    OpenAiProvider,
};
pub use notifier::{Notifier, NotifyOutcome, PostAction, PostNotice};
pub use post_service::PostService;
