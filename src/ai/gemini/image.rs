use super::client::GeminiHttpClient;
use super::types::{PredictInstance, PredictParameters, PredictRequest, PredictResponse};
use crate::ai::ImageGenerationService;
use crate::models::{PrimaryImageRequest, MAX_IMAGES_PER_REQUEST};
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use std::time::Duration;

const IMAGE_TIMEOUT: Duration = Duration::from_secs(120);

/// Imagen text-to-image client (Gemini API `predict` endpoint).
pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, IMAGE_TIMEOUT, client),
        }
    }

    /// Override the per-request HTTP deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiImageClient);

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate_images(&self, request: &PrimaryImageRequest) -> Result<Vec<Vec<u8>>> {
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: request.prompt.clone(),
            }],
            parameters: PredictParameters {
                sample_count: request.count.clamp(1, MAX_IMAGES_PER_REQUEST),
                aspect_ratio: request.aspect_ratio.clone(),
                negative_prompt: Some(request.negative_prompt.clone())
                    .filter(|n| !n.is_empty()),
                safety_setting: request.safety_level.clone(),
            },
        };

        let response: PredictResponse = self.http.predict(&body).await?;

        let images = response
            .predictions
            .iter()
            .filter_map(|p| p.bytes_base64_encoded.as_deref())
            .map(|b64| {
                base64::engine::general_purpose::STANDARD
                    .decode(b64)
                    .map_err(|e| {
                        Error::AiProvider(format!("Failed to decode Imagen base64 image: {}", e))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        if images.is_empty() {
            return Err(Error::AiProvider(
                "No image data in Imagen response".to_string(),
            ));
        }

        tracing::debug!(
            "Imagen returned {} of {} requested images",
            images.len(),
            request.count
        );

        Ok(images)
    }
}
