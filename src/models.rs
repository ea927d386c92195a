//! Data models and structures
//!
//! Defines the request/result types flowing through the pipeline, the record
//! handed to callers for persistence, and environment-driven configuration.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Largest number of images a single request may ask for.
pub const MAX_IMAGES_PER_REQUEST: usize = 4;

/// Number of images produced when the caller does not specify a count.
pub const DEFAULT_IMAGE_COUNT: usize = 4;

/// Validated input to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    requested_count: usize,
}

impl GenerationRequest {
    /// Validate a raw prompt and image count.
    ///
    /// The prompt must contain a non-whitespace character and is kept
    /// verbatim; the count must lie in `1..=MAX_IMAGES_PER_REQUEST`.
    pub fn new(prompt: &str, requested_count: usize) -> Result<Self> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidRequest("prompt must not be empty".to_string()));
        }
        if !(1..=MAX_IMAGES_PER_REQUEST).contains(&requested_count) {
            return Err(Error::InvalidRequest(format!(
                "requested_count must be between 1 and {}, got {}",
                MAX_IMAGES_PER_REQUEST, requested_count
            )));
        }

        Ok(Self {
            prompt: prompt.to_string(),
            requested_count,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn requested_count(&self) -> usize {
        self.requested_count
    }
}

/// Prompt actually sent to image providers. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnhancedPrompt {
    pub text: String,
}

impl EnhancedPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for EnhancedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Opaque, client-resolvable image location (URL or `data:` URI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output of one pipeline invocation, in generation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub image_references: Vec<ImageReference>,
    pub enhanced_prompt: EnhancedPrompt,
}

/// Parameters sent to the primary AI image model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryImageRequest {
    pub prompt: String,
    pub count: usize,
    pub aspect_ratio: String,
    pub safety_level: String,
    pub negative_prompt: String,
}

/// Persistable snapshot of one generation, ready for the caller's storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: Uuid,
    pub original_prompt: String,
    pub enhanced_prompt: String,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GenerationRecord {
    pub fn from_result(
        original_prompt: &str,
        result: GenerationResult,
        category: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_prompt: original_prompt.to_string(),
            enhanced_prompt: result.enhanced_prompt.text,
            image_urls: result
                .image_references
                .into_iter()
                .map(ImageReference::into_string)
                .collect(),
            category,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Gemini,
}

impl AiProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Some(AiProvider::OpenAi),
            "gemini" | "google" => Some(AiProvider::Gemini),
            _ => None,
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub chat_provider: AiProvider,
    pub chat_model: String,
    pub image_provider: AiProvider,
    pub image_model: String,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub enhancement_available: bool,
    pub primary_provider_available: bool,
    pub aspect_ratio: String,
    pub safety_level: String,
    pub secondary_base_url: String,
    pub stock_base_url: String,
    pub placeholder_base_url: String,
    pub enhance_timeout: Duration,
    pub image_timeout: Duration,
    pub probe_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = |key: &str| -> Result<AiProvider> {
            match get(key) {
                None => Ok(AiProvider::Gemini),
                Some(value) => AiProvider::parse(&value).ok_or_else(|| {
                    Error::Config(format!("{} must be 'openai' or 'gemini', got '{}'", key, value))
                }),
            }
        };

        let secs = |key: &str, default: u64| -> Result<Duration> {
            match get(key) {
                None => Ok(Duration::from_secs(default)),
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| {
                        Error::Config(format!("{} must be a whole number of seconds", key))
                    }),
            }
        };

        let flag = |key: &str, default: bool| -> Result<bool> {
            match get(key) {
                None => Ok(default),
                Some(value) => match value.trim().to_lowercase().as_str() {
                    "1" | "true" | "yes" | "on" => Ok(true),
                    "0" | "false" | "no" | "off" => Ok(false),
                    _ => Err(Error::Config(format!("{} must be true or false", key))),
                },
            }
        };

        let chat_provider = provider("CHAT_PROVIDER")?;
        let image_provider = provider("IMAGE_PROVIDER")?;
        let openai_api_key = get("OPENAI_API_KEY");
        let gemini_api_key = get("GEMINI_API_KEY");

        let has_key = |p: AiProvider| match p {
            AiProvider::OpenAi => openai_api_key.is_some(),
            AiProvider::Gemini => gemini_api_key.is_some(),
        };
        let enhancement_available = has_key(chat_provider);
        let primary_provider_available =
            has_key(image_provider) && flag("PRIMARY_IMAGE_ENABLED", true)?;

        let default_chat_model = match chat_provider {
            AiProvider::OpenAi => "gpt-4o-mini",
            AiProvider::Gemini => "gemini-2.5-flash",
        };
        let default_image_model = match image_provider {
            AiProvider::OpenAi => "gpt-image-1",
            AiProvider::Gemini => "imagen-3.0-generate-002",
        };

        Ok(Self {
            chat_provider,
            chat_model: get("CHAT_MODEL").unwrap_or_else(|| default_chat_model.to_string()),
            image_provider,
            image_model: get("IMAGE_MODEL").unwrap_or_else(|| default_image_model.to_string()),
            openai_api_key,
            gemini_api_key,
            enhancement_available,
            primary_provider_available,
            aspect_ratio: get("IMAGE_ASPECT_RATIO").unwrap_or_else(|| "1:1".to_string()),
            safety_level: get("IMAGE_SAFETY_LEVEL")
                .unwrap_or_else(|| "block_medium_and_above".to_string()),
            secondary_base_url: get("SECONDARY_BASE_URL")
                .unwrap_or_else(|| "https://image.pollinations.ai".to_string()),
            stock_base_url: get("STOCK_BASE_URL")
                .unwrap_or_else(|| "https://source.unsplash.com".to_string()),
            placeholder_base_url: get("PLACEHOLDER_BASE_URL")
                .unwrap_or_else(|| "https://picsum.photos".to_string()),
            enhance_timeout: secs("ENHANCE_TIMEOUT_SECS", 30)?,
            image_timeout: secs("IMAGE_TIMEOUT_SECS", 120)?,
            probe_timeout: secs("PROBE_TIMEOUT_SECS", 30)?,
        })
    }

    /// API key for `provider`, if one was configured.
    pub fn api_key_for(&self, provider: AiProvider) -> Option<&str> {
        match provider {
            AiProvider::OpenAi => self.openai_api_key.as_deref(),
            AiProvider::Gemini => self.gemini_api_key.as_deref(),
        }
    }
}
