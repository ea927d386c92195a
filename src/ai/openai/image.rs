use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::ImageGenerationService;
use crate::models::{PrimaryImageRequest, MAX_IMAGES_PER_REQUEST};
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use std::time::Duration;

const IMAGE_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, IMAGE_TIMEOUT, client),
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

/// Closest supported output size for an `W:H` aspect ratio.
fn size_for_aspect_ratio(aspect_ratio: &str) -> &'static str {
    let parsed = aspect_ratio
        .split_once(':')
        .and_then(|(w, h)| Some((w.trim().parse::<f32>().ok()?, h.trim().parse::<f32>().ok()?)))
        .filter(|(_, h)| *h > 0.0);

    match parsed {
        Some((w, h)) if w / h > 1.2 => "1536x1024",
        Some((w, h)) if w / h < 0.83 => "1024x1536",
        _ => "1024x1024",
    }
}

/// OpenAI only distinguishes strict (default) and relaxed moderation.
fn moderation_for_safety_level(safety_level: &str) -> Option<String> {
    match safety_level {
        "block_few" | "block_only_high" | "block_none" => Some("low".to_string()),
        _ => None,
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate_images(&self, request: &PrimaryImageRequest) -> Result<Vec<Vec<u8>>> {
        // No native negative prompt; fold it into the instruction.
        let prompt = if request.negative_prompt.is_empty() {
            request.prompt.clone()
        } else {
            format!("{}\n\nAvoid: {}", request.prompt, request.negative_prompt)
        };

        let body = ImageGenerationRequest {
            model: self.model.clone(),
            prompt,
            n: request.count.clamp(1, MAX_IMAGES_PER_REQUEST) as u32,
            size: size_for_aspect_ratio(&request.aspect_ratio).to_string(),
            quality: "medium".to_string(),
            moderation: moderation_for_safety_level(&request.safety_level),
        };

        let response: ImageGenerationResponse =
            self.http.post("/v1/images/generations", &body).await?;

        if response.data.is_empty() {
            return Err(Error::AiProvider(
                "No image data in OpenAI response".to_string(),
            ));
        }

        let mut images = Vec::with_capacity(response.data.len());
        for image_data in &response.data {
            let bytes = if let Some(b64_json) = &image_data.b64_json {
                base64::engine::general_purpose::STANDARD
                    .decode(b64_json)
                    .map_err(|e| {
                        Error::AiProvider(format!("Failed to decode base64 image: {}", e))
                    })?
            } else if let Some(url) = &image_data.url {
                self.http.download(url).await?
            } else {
                return Err(Error::AiProvider(
                    "No image data (neither base64 nor URL) in response".to_string(),
                ));
            };
            images.push(bytes);
        }

        Ok(images)
    }
}
