use super::{ImageTier, FALLBACK_IMAGE_SIZE};
use crate::category;
use crate::models::ImageReference;
use crate::seed::{seed, STOCK_SIG_BOUND};
use crate::Result;
use async_trait::async_trait;

/// Thematic stock photos keyed by prompt category. Pure construction, never fails.
#[derive(Debug, Clone)]
pub struct StockTier {
    base_url: String,
}

impl StockTier {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Stock reference for a single index of `prompt`.
    pub fn reference(&self, prompt: &str, index: usize) -> ImageReference {
        self.reference_for_term(&category::search_term(prompt), prompt, index)
    }

    /// References for indices `0..count`.
    pub fn references(&self, prompt: &str, count: usize) -> Vec<ImageReference> {
        let term = category::search_term(prompt);
        (0..count)
            .map(|index| self.reference_for_term(&term, prompt, index))
            .collect()
    }

    fn reference_for_term(&self, term: &str, prompt: &str, index: usize) -> ImageReference {
        ImageReference::new(format!(
            "{}/{size}x{size}/?{}&sig={}",
            self.base_url,
            term,
            seed(prompt, index, STOCK_SIG_BOUND),
            size = FALLBACK_IMAGE_SIZE
        ))
    }
}

#[async_trait]
impl ImageTier for StockTier {
    fn name(&self) -> &str {
        "stock"
    }

    async fn attempt(&self, prompt: &str, count: usize) -> Result<Vec<ImageReference>> {
        Ok(self.references(prompt, count))
    }
}
