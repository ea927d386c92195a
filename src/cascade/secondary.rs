use super::{ImageTier, StockTier, FALLBACK_IMAGE_SIZE};
use crate::models::ImageReference;
use crate::probe::ReachabilityProbe;
use crate::seed::{seed, GENERATION_SEED_BOUND};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Free text-to-image service addressed purely by URL.
///
/// Each index is probed on its own; an unreachable index is replaced by the
/// stock reference for that same index instead of failing the batch.
pub struct SecondaryTier {
    base_url: String,
    probe: Box<dyn ReachabilityProbe>,
    probe_timeout: Duration,
    fallback: StockTier,
}

impl SecondaryTier {
    pub fn new(
        base_url: impl Into<String>,
        probe: Box<dyn ReachabilityProbe>,
        probe_timeout: Duration,
        fallback: StockTier,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            probe,
            probe_timeout,
            fallback,
        }
    }

    /// Generation URL for one index of `prompt`.
    pub fn url_for(&self, prompt: &str, index: usize) -> String {
        format!(
            "{}/prompt/{}?width={size}&height={size}&seed={}&nologo=true",
            self.base_url,
            urlencoding::encode(prompt),
            seed(prompt, index, GENERATION_SEED_BOUND),
            size = FALLBACK_IMAGE_SIZE
        )
    }

    async fn check(&self, url: &str) -> Result<bool> {
        tokio::time::timeout(self.probe_timeout, self.probe.is_reachable(url))
            .await
            .map_err(|_| {
                Error::Timeout(format!("probe exceeded {:?}", self.probe_timeout))
            })?
    }
}

#[async_trait]
impl ImageTier for SecondaryTier {
    fn name(&self) -> &str {
        "secondary"
    }

    async fn attempt(&self, prompt: &str, count: usize) -> Result<Vec<ImageReference>> {
        let mut references = Vec::with_capacity(count);

        for index in 0..count {
            let url = self.url_for(prompt, index);
            match self.check(&url).await {
                Ok(true) => {
                    debug!("[secondary] image {} reachable", index);
                    references.push(ImageReference::new(url));
                }
                Ok(false) => {
                    warn!("[secondary] image {} unreachable, using stock photo", index);
                    references.push(self.fallback.reference(prompt, index));
                }
                Err(e) => {
                    warn!(
                        "[secondary] probe for image {} failed: {}. Using stock photo",
                        index, e
                    );
                    references.push(self.fallback.reference(prompt, index));
                }
            }
        }

        if references.is_empty() {
            return Err(Error::AiProvider(
                "secondary service produced no images".to_string(),
            ));
        }

        Ok(references)
    }
}
