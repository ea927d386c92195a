use super::FALLBACK_IMAGE_SIZE;
use crate::models::ImageReference;
use crate::seed::{seed, PLACEHOLDER_SEED_BOUND};

/// Deterministic placeholder images. Not a cascade tier: the pipeline draws
/// on it when every tier fails and to fill indices a partial tier left open.
#[derive(Debug, Clone)]
pub struct PlaceholderSource {
    base_url: String,
}

impl PlaceholderSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Placeholder for one index, seeded by the raw (unenhanced) prompt.
    pub fn reference(&self, raw_prompt: &str, index: usize) -> ImageReference {
        ImageReference::new(format!(
            "{}/seed/{}/{size}/{size}",
            self.base_url,
            seed(raw_prompt, index, PLACEHOLDER_SEED_BOUND),
            size = FALLBACK_IMAGE_SIZE
        ))
    }

    pub fn references(&self, raw_prompt: &str, count: usize) -> Vec<ImageReference> {
        (0..count)
            .map(|index| self.reference(raw_prompt, index))
            .collect()
    }
}
