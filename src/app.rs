//! Pipeline orchestration: enhance the prompt, then run the provider cascade.

use crate::ai::{
    ChatService, GeminiChatClient, GeminiImageClient, ImageGenerationService, OpenAiChatClient,
    OpenAiImageClient,
};
use crate::cascade::{
    ImageTier, PlaceholderSource, PrimaryTier, ProviderCascade, SecondaryTier, StockTier,
};
use crate::enhancer::PromptEnhancer;
use crate::models::{
    AiProvider, Config, EnhancedPrompt, GenerationRequest, GenerationResult, DEFAULT_IMAGE_COUNT,
};
use crate::probe::HttpProbe;
use crate::Result;
use tracing::{error, info, warn};

/// Stateless image-acquisition pipeline. Safe to share across concurrent calls.
pub struct ImagePipeline {
    enhancer: PromptEnhancer,
    cascade: ProviderCascade,
    placeholder: PlaceholderSource,
}

/// Injectable component bundle used to construct [`ImagePipeline`] in tests/harnesses.
pub struct PipelineServices {
    pub enhancer: PromptEnhancer,
    /// Tiers in priority order.
    pub tiers: Vec<Box<dyn ImageTier>>,
    pub placeholder: PlaceholderSource,
}

impl ImagePipeline {
    /// Build a pipeline from concrete components.
    ///
    /// This is primarily useful for integration tests and local harnesses that
    /// need to inject mocks or a custom tier order.
    pub fn with_services(services: PipelineServices) -> Self {
        Self {
            enhancer: services.enhancer,
            cascade: ProviderCascade::new(services.tiers),
            placeholder: services.placeholder,
        }
    }

    fn build_ai_client<T, FOpenAi, FGemini>(
        provider: AiProvider,
        model: &str,
        api_key: String,
        http_client: reqwest::Client,
        capability: &str,
        openai_builder: FOpenAi,
        gemini_builder: FGemini,
    ) -> T
    where
        FOpenAi: FnOnce(String, String, reqwest::Client) -> T,
        FGemini: FnOnce(String, String, reqwest::Client) -> T,
    {
        match provider {
            AiProvider::OpenAi => {
                info!("{} provider: OpenAI (model: {})", capability, model);
                openai_builder(api_key, model.to_string(), http_client)
            }
            AiProvider::Gemini => {
                info!("{} provider: Gemini (model: {})", capability, model);
                gemini_builder(api_key, model.to_string(), http_client)
            }
        }
    }

    /// Construct the standard four-tier pipeline from configuration.
    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        let chat: Option<Box<dyn ChatService>> = config
            .api_key_for(config.chat_provider)
            .filter(|_| config.enhancement_available)
            .map(|api_key| {
                Self::build_ai_client(
                    config.chat_provider,
                    &config.chat_model,
                    api_key.to_string(),
                    http_client.clone(),
                    "Chat",
                    |api_key, model, client| {
                        Box::new(
                            OpenAiChatClient::new_with_client(api_key, model, client)
                                .with_timeout(config.enhance_timeout),
                        )
                            as Box<dyn ChatService>
                    },
                    |api_key, model, client| {
                        Box::new(
                            GeminiChatClient::new_with_client(api_key, model, client)
                                .with_timeout(config.enhance_timeout),
                        )
                            as Box<dyn ChatService>
                    },
                )
            });

        let enhancer = match chat {
            Some(chat) => PromptEnhancer::new(chat).with_timeout(config.enhance_timeout),
            None => {
                info!("No language model configured; prompts will not be enhanced");
                PromptEnhancer::disabled()
            }
        };

        let image_gen: Option<Box<dyn ImageGenerationService>> = config
            .api_key_for(config.image_provider)
            .filter(|_| config.primary_provider_available)
            .map(|api_key| {
                Self::build_ai_client(
                    config.image_provider,
                    &config.image_model,
                    api_key.to_string(),
                    http_client.clone(),
                    "Image",
                    |api_key, model, client| {
                        Box::new(
                            OpenAiImageClient::new_with_client(api_key, model, client)
                                .with_timeout(config.image_timeout),
                        )
                            as Box<dyn ImageGenerationService>
                    },
                    |api_key, model, client| {
                        Box::new(
                            GeminiImageClient::new_with_client(api_key, model, client)
                                .with_timeout(config.image_timeout),
                        )
                            as Box<dyn ImageGenerationService>
                    },
                )
            });

        let stock = StockTier::new(config.stock_base_url.clone());

        let primary = match image_gen {
            Some(service) => PrimaryTier::new(service, stock.clone()),
            None => {
                info!("Primary image model unavailable; starting at the secondary tier");
                PrimaryTier::unavailable(stock.clone())
            }
        }
        .with_aspect_ratio(config.aspect_ratio.clone())
        .with_safety_level(config.safety_level.clone())
        .with_timeout(config.image_timeout);

        let secondary = SecondaryTier::new(
            config.secondary_base_url.clone(),
            Box::new(HttpProbe::new_with_client(config.probe_timeout, http_client)),
            config.probe_timeout,
            stock.clone(),
        );

        Self::with_services(PipelineServices {
            enhancer,
            tiers: vec![Box::new(primary), Box::new(secondary), Box::new(stock)],
            placeholder: PlaceholderSource::new(config.placeholder_base_url.clone()),
        })
    }

    pub fn tier_names(&self) -> Vec<&str> {
        self.cascade.tier_names()
    }

    /// Generate `requested_count` image references for `prompt`.
    ///
    /// Only input validation errors are returned; provider failures degrade
    /// through the cascade and, as a last resort, to placeholder images. The
    /// prompt is passed on verbatim, so degraded results echo it unchanged.
    pub async fn generate(&self, prompt: &str, requested_count: usize) -> Result<GenerationResult> {
        let request = GenerationRequest::new(prompt, requested_count)?;
        Ok(self.run(&request).await)
    }

    /// [`generate`](Self::generate) with the default image count.
    pub async fn generate_default(&self, prompt: &str) -> Result<GenerationResult> {
        self.generate(prompt, DEFAULT_IMAGE_COUNT).await
    }

    /// Run a validated request. Always yields `requested_count` references.
    ///
    /// Only `Err` values from the cascade reach the placeholder fallback; a
    /// panicking tier unwinds through this call.
    pub async fn run(&self, request: &GenerationRequest) -> GenerationResult {
        let count = request.requested_count();
        info!("Generating {} image(s) for prompt: {}", count, request.prompt());

        let enhanced_prompt = self.enhancer.enhance(request.prompt()).await;

        match self.cascade.run(enhanced_prompt.as_str(), count).await {
            Ok(outcome) => {
                info!("Images served by the {} tier", outcome.tier);
                let mut image_references = outcome.references;
                let served = image_references.len();
                if served < count {
                    warn!(
                        "Filling {} missing image(s) from the {} tier with placeholders",
                        count - served,
                        outcome.tier
                    );
                    image_references.extend(
                        (served..count)
                            .map(|index| self.placeholder.reference(request.prompt(), index)),
                    );
                }
                GenerationResult {
                    image_references,
                    enhanced_prompt,
                }
            }
            Err(e) => {
                error!("Image cascade failed ({}); returning placeholders", e);
                GenerationResult {
                    image_references: self.placeholder.references(request.prompt(), count),
                    enhanced_prompt: EnhancedPrompt::new(request.prompt()),
                }
            }
        }
    }
}
