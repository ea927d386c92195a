use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse};
use crate::ai::ChatService;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const CHAT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnhanceRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: SamplingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SamplingConfig {
    max_output_tokens: u32,
    temperature: f32,
}

impl EnhanceRequest {
    fn for_prompt(prompt: &str) -> Self {
        Self {
            system_instruction: Content::text(None, prompts::ENHANCE_SYSTEM),
            contents: vec![Content::text(Some("user"), prompts::enhance_request(prompt))],
            generation_config: SamplingConfig {
                max_output_tokens: prompts::ENHANCE_MAX_TOKENS,
                temperature: prompts::ENHANCE_TEMPERATURE,
            },
        }
    }
}

/// Prompt enhancement through Gemini `generateContent`.
pub struct GeminiChatClient {
    http: GeminiHttpClient,
}

impl GeminiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, CHAT_TIMEOUT, client),
        }
    }

    /// Override the per-request HTTP deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiChatClient);

#[async_trait]
impl ChatService for GeminiChatClient {
    async fn enhance_prompt(&self, prompt: &str) -> Result<String> {
        let response: GenerateContentResponse = self
            .http
            .generate_content(&EnhanceRequest::for_prompt(prompt))
            .await?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| Error::AiProvider("Gemini returned no text candidate".to_string()))
    }
}
