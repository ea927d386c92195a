use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::ai::ChatService;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

const CHAT_TIMEOUT: Duration = Duration::from_secs(30);

/// Prompt enhancement through OpenAI chat completions.
pub struct OpenAiChatClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, CHAT_TIMEOUT, client),
            model,
        }
    }

    /// Override the per-request HTTP deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ChatService for OpenAiChatClient {
    async fn enhance_prompt(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompts::ENHANCE_SYSTEM),
                ChatMessage::user(prompts::enhance_request(prompt)),
            ],
            max_completion_tokens: prompts::ENHANCE_MAX_TOKENS,
            temperature: Some(prompts::ENHANCE_TEMPERATURE),
        };

        let response = self.http.chat_completion(request).await?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| Error::AiProvider("OpenAI chat returned no text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_enhance_prompt_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "A weathered oak bench under autumn light"
                    },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("test-key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        let enhanced = client.enhance_prompt("a bench").await.unwrap();
        assert_eq!(enhanced, "A weathered oak bench under autumn light");
    }

    #[tokio::test]
    async fn test_enhance_prompt_sends_configured_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains("\"model\":\"custom-model\""))
            .and(body_string_contains("a bench"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "scene" },
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("key".to_string(), "custom-model".to_string())
            .with_base_url(server.uri());

        client.enhance_prompt("a bench").await.unwrap();
    }

    #[tokio::test]
    async fn test_request_carries_system_instructions_and_budget() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains("\"role\":\"system\""))
            .and(body_string_contains("\"max_completion_tokens\":400"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "scene" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        client.enhance_prompt("a bench").await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        let err = client.enhance_prompt("x").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_configured_timeout_applies_to_requests() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "choices": [] }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(100));

        let err = client.enhance_prompt("x").await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }

    #[tokio::test]
    async fn test_missing_content_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant" } }]
            })))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new("key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        let err = client.enhance_prompt("x").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
