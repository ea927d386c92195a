//! Prompt enhancement with silent fallback to the raw prompt.

use crate::ai::ChatService;
use crate::models::EnhancedPrompt;
use crate::{Error, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_ENHANCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Rewrites user prompts through a language model. Never fails: any error,
/// timeout, or empty answer yields the original prompt unchanged.
pub struct PromptEnhancer {
    chat: Option<Box<dyn ChatService>>,
    timeout: Duration,
}

impl PromptEnhancer {
    pub fn new(chat: Box<dyn ChatService>) -> Self {
        Self {
            chat: Some(chat),
            timeout: DEFAULT_ENHANCE_TIMEOUT,
        }
    }

    /// Enhancer with no language model; prompts pass through untouched.
    pub fn disabled() -> Self {
        Self {
            chat: None,
            timeout: DEFAULT_ENHANCE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn enhance(&self, prompt: &str) -> EnhancedPrompt {
        match self.try_enhance(prompt).await {
            Ok(text) => {
                info!("Enhanced prompt ({} chars): {}", text.len(), text);
                EnhancedPrompt::new(text)
            }
            Err(Error::ProviderUnavailable(reason)) => {
                debug!("Skipping prompt enhancement: {}", reason);
                EnhancedPrompt::new(prompt)
            }
            Err(e) => {
                warn!("Prompt enhancement failed, using original prompt: {}", e);
                EnhancedPrompt::new(prompt)
            }
        }
    }

    async fn try_enhance(&self, prompt: &str) -> Result<String> {
        let chat = self.chat.as_ref().ok_or_else(|| {
            Error::ProviderUnavailable("no language model configured".to_string())
        })?;

        let text = tokio::time::timeout(self.timeout, chat.enhance_prompt(prompt))
            .await
            .map_err(|_| Error::Timeout(format!("enhancement exceeded {:?}", self.timeout)))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(Error::AiProvider(
                "language model returned an empty prompt".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}
