//! AI service integration for prompt enhancement and image generation
//!
//! Provides provider-agnostic traits for the language model used to enrich
//! prompts and the primary image model, with Gemini and OpenAI backends.

pub mod gemini;
mod http;
pub mod mime;
pub mod mock;
pub mod openai;

pub use gemini::{GeminiChatClient, GeminiImageClient};
pub use mock::{MockChatClient, MockImageGenerationClient};
pub use openai::{OpenAiChatClient, OpenAiImageClient};

use crate::models::PrimaryImageRequest;
use crate::Result;
use async_trait::async_trait;

/// Language-model capability used to rewrite a raw prompt.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Return a richer generation prompt for `prompt`. Single attempt, no retry.
    async fn enhance_prompt(&self, prompt: &str) -> Result<String>;
}

/// Primary AI image model.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Generate up to `request.count` images and return their raw bytes.
    async fn generate_images(&self, request: &PrimaryImageRequest) -> Result<Vec<Vec<u8>>>;
}
