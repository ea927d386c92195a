use crate::ai::http::send_json;
use crate::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_VERSION: &str = "v1beta";

/// Gemini REST transport shared by the chat and Imagen clients.
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// `model` may be given bare (`imagen-3.0-generate-002`) or as `models/...`.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = match model.strip_prefix("models/") {
            Some(bare) => bare.to_string(),
            None => model,
        };

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Per-request deadline applied to every call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/models/{}:{}",
            self.base_url, API_VERSION, self.model, action
        )
    }

    async fn call<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        action: &str,
        body: &Req,
    ) -> Result<Resp> {
        let request = self
            .client
            .post(self.endpoint(action))
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .json(body);
        send_json("Gemini", request).await
    }

    /// Text generation (`generateContent`).
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        body: &Req,
    ) -> Result<Resp> {
        self.call("generateContent", body).await
    }

    /// Imagen generation (`predict`).
    pub async fn predict<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        body: &Req,
    ) -> Result<Resp> {
        self.call("predict", body).await
    }
}
