use super::{ImageTier, StockTier};
use crate::ai::mime::to_data_uri;
use crate::ai::ImageGenerationService;
use crate::models::{ImageReference, PrimaryImageRequest, MAX_IMAGES_PER_REQUEST};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_ASPECT_RATIO: &str = "1:1";
pub const DEFAULT_SAFETY_LEVEL: &str = "block_medium_and_above";
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(120);

/// AI image model tier. Results are embedded as `data:` URIs.
pub struct PrimaryTier {
    service: Option<Box<dyn ImageGenerationService>>,
    aspect_ratio: String,
    safety_level: String,
    negative_prompt: String,
    timeout: Duration,
    fallback: StockTier,
}

impl PrimaryTier {
    pub fn new(service: Box<dyn ImageGenerationService>, fallback: StockTier) -> Self {
        Self::build(Some(service), fallback)
    }

    /// A tier with no configured model; every attempt reports unavailability.
    pub fn unavailable(fallback: StockTier) -> Self {
        Self::build(None, fallback)
    }

    fn build(service: Option<Box<dyn ImageGenerationService>>, fallback: StockTier) -> Self {
        Self {
            service,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            safety_level: DEFAULT_SAFETY_LEVEL.to_string(),
            negative_prompt: prompts::negative_prompt().to_string(),
            timeout: DEFAULT_IMAGE_TIMEOUT,
            fallback,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    pub fn with_safety_level(mut self, safety_level: impl Into<String>) -> Self {
        self.safety_level = safety_level.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_available(&self) -> bool {
        self.service.is_some()
    }
}

#[async_trait]
impl ImageTier for PrimaryTier {
    fn name(&self) -> &str {
        "primary"
    }

    async fn attempt(&self, prompt: &str, count: usize) -> Result<Vec<ImageReference>> {
        let service = self.service.as_ref().ok_or_else(|| {
            Error::ProviderUnavailable("primary image model is not configured".to_string())
        })?;

        let count = count.min(MAX_IMAGES_PER_REQUEST);
        let request = PrimaryImageRequest {
            prompt: prompt.to_string(),
            count,
            aspect_ratio: self.aspect_ratio.clone(),
            safety_level: self.safety_level.clone(),
            negative_prompt: self.negative_prompt.clone(),
        };

        let images = tokio::time::timeout(self.timeout, service.generate_images(&request))
            .await
            .map_err(|_| {
                Error::Timeout(format!("primary image model exceeded {:?}", self.timeout))
            })??;

        let mut references: Vec<ImageReference> = images
            .iter()
            .filter(|bytes| !bytes.is_empty())
            .take(count)
            .map(|bytes| ImageReference::new(to_data_uri(bytes)))
            .collect();

        if references.is_empty() {
            return Err(Error::AiProvider(
                "primary image model returned no images".to_string(),
            ));
        }

        if references.len() < count {
            warn!(
                "[primary] model returned {} of {} images, filling the rest with stock photos",
                references.len(),
                count
            );
            for index in references.len()..count {
                references.push(self.fallback.reference(prompt, index));
            }
        }

        info!("[primary] generated {} image(s)", count);
        Ok(references)
    }
}
