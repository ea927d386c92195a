use pretty_assertions::assert_eq;
use stockly_images::{
    ai::{MockChatClient, MockImageGenerationClient},
    app::{ImagePipeline, PipelineServices},
    cascade::{ImageTier, PlaceholderSource, PrimaryTier, SecondaryTier, StockTier},
    category,
    enhancer::PromptEnhancer,
    models::{Config, GenerationRecord, ImageReference},
    probe::{HttpProbe, MockProbe},
    seed::{seed, GENERATION_SEED_BOUND, STOCK_SIG_BOUND},
    Error, Result,
};
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STOCK: &str = "https://stock.test";
const PLACEHOLDER: &str = "https://placeholder.test";

struct BrokenTier;

#[async_trait::async_trait]
impl ImageTier for BrokenTier {
    fn name(&self) -> &str {
        "broken"
    }

    async fn attempt(&self, _prompt: &str, _count: usize) -> Result<Vec<ImageReference>> {
        Err(Error::AiProvider("forced".to_string()))
    }
}

/// Serves only the first index, whatever the count.
struct SingleImageTier;

#[async_trait::async_trait]
impl ImageTier for SingleImageTier {
    fn name(&self) -> &str {
        "single"
    }

    async fn attempt(&self, _prompt: &str, _count: usize) -> Result<Vec<ImageReference>> {
        Ok(vec![ImageReference::new("https://single.test/0")])
    }
}

fn pipeline_with_probe_server(
    chat: MockChatClient,
    image_gen: Option<MockImageGenerationClient>,
    server: &MockServer,
) -> ImagePipeline {
    let stock = StockTier::new(STOCK);
    let primary = match image_gen {
        Some(client) => PrimaryTier::new(Box::new(client), stock.clone()),
        None => PrimaryTier::unavailable(stock.clone()),
    };

    ImagePipeline::with_services(PipelineServices {
        enhancer: PromptEnhancer::new(Box::new(chat)),
        tiers: vec![
            Box::new(primary),
            Box::new(SecondaryTier::new(
                server.uri(),
                Box::new(HttpProbe::new(Duration::from_secs(5))),
                Duration::from_secs(30),
                stock.clone(),
            )),
            Box::new(stock),
        ],
        placeholder: PlaceholderSource::new(PLACEHOLDER),
    })
}

#[tokio::test]
async fn test_secondary_service_serves_all_indices_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path_regex(r"^/prompt/.+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(4)
        .mount(&server)
        .await;

    let pipeline = pipeline_with_probe_server(
        MockChatClient::new().with_response("misty forest at sunrise".to_string()),
        None,
        &server,
    );

    let result = pipeline.generate("forest", 4).await.unwrap();

    let expected: Vec<ImageReference> = (0..4)
        .map(|i| {
            ImageReference::new(format!(
                "{}/prompt/misty%20forest%20at%20sunrise?width=512&height=512&seed={}&nologo=true",
                server.uri(),
                seed("misty forest at sunrise", i, GENERATION_SEED_BOUND)
            ))
        })
        .collect();
    assert_eq!(result.image_references, expected);
    assert_eq!(result.enhanced_prompt.as_str(), "misty forest at sunrise");
}

#[tokio::test]
async fn test_unreachable_secondary_falls_back_to_thematic_stock() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let enhanced = "a toddler reading a book in the park";
    let pipeline = pipeline_with_probe_server(
        MockChatClient::new().with_response(enhanced.to_string()),
        Some(MockImageGenerationClient::new().with_failure(true)),
        &server,
    );

    let result = pipeline.generate("kid reading", 3).await.unwrap();

    let expected: Vec<ImageReference> = (0..3)
        .map(|i| {
            ImageReference::new(format!(
                "{}/512x512/?baby,book,park&sig={}",
                STOCK,
                seed(enhanced, i, STOCK_SIG_BOUND)
            ))
        })
        .collect();
    assert_eq!(result.image_references, expected);
    assert_eq!(category::search_term(enhanced), "baby,book,park");
}

#[tokio::test]
async fn test_repeated_prompt_yields_identical_fallback_references() {
    let build = || {
        ImagePipeline::with_services(PipelineServices {
            enhancer: PromptEnhancer::disabled(),
            tiers: vec![
                Box::new(PrimaryTier::unavailable(StockTier::new(STOCK))),
                Box::new(SecondaryTier::new(
                    "https://gen.test",
                    Box::new(MockProbe::unreachable().with_sequence(&[true])),
                    Duration::from_secs(30),
                    StockTier::new(STOCK),
                )),
            ],
            placeholder: PlaceholderSource::new(PLACEHOLDER),
        })
    };

    let first = build().generate("a sunset over mountains", 4).await.unwrap();
    let second = build().generate("a sunset over mountains", 4).await.unwrap();

    assert_eq!(first, second);
    assert!(first.image_references[0]
        .as_str()
        .starts_with("https://gen.test/prompt/"));
    assert!(first.image_references[1..]
        .iter()
        .all(|r| r.as_str().contains("?lifestyle&sig=")));
}

#[tokio::test]
async fn test_everything_failing_returns_placeholders_and_raw_prompt() {
    let pipeline = ImagePipeline::with_services(PipelineServices {
        enhancer: PromptEnhancer::new(Box::new(MockChatClient::new().with_failure(true))),
        tiers: vec![Box::new(BrokenTier), Box::new(BrokenTier)],
        placeholder: PlaceholderSource::new(PLACEHOLDER),
    });

    let result = pipeline.generate("hello world", 2).await.unwrap();

    assert_eq!(result.enhanced_prompt.as_str(), "hello world");
    assert_eq!(result.image_references.len(), 2);
    assert!(result
        .image_references
        .iter()
        .all(|r| !r.as_str().is_empty()));
    assert_eq!(
        result.image_references[0].as_str(),
        "https://placeholder.test/seed/845135/512/512"
    );
}

#[tokio::test]
async fn test_partial_tier_answer_is_final() {
    let pipeline = ImagePipeline::with_services(PipelineServices {
        enhancer: PromptEnhancer::disabled(),
        tiers: vec![Box::new(SingleImageTier), Box::new(StockTier::new(STOCK))],
        placeholder: PlaceholderSource::new(PLACEHOLDER),
    });

    let result = pipeline.generate("hello world", 3).await.unwrap();

    let placeholders = PlaceholderSource::new(PLACEHOLDER);
    assert_eq!(
        result.image_references,
        vec![
            ImageReference::new("https://single.test/0"),
            placeholders.reference("hello world", 1),
            placeholders.reference("hello world", 2),
        ]
    );
    assert!(result
        .image_references
        .iter()
        .all(|r| !r.as_str().starts_with(STOCK)));
}

#[tokio::test]
async fn test_invalid_count_is_a_validation_error() {
    let pipeline = ImagePipeline::with_services(PipelineServices {
        enhancer: PromptEnhancer::disabled(),
        tiers: vec![Box::new(StockTier::new(STOCK))],
        placeholder: PlaceholderSource::new(PLACEHOLDER),
    });

    assert!(matches!(
        pipeline.generate("prompt", 0).await,
        Err(Error::InvalidRequest(_))
    ));
    assert!(matches!(
        pipeline.generate("prompt", 5).await,
        Err(Error::InvalidRequest(_))
    ));
    assert!(matches!(
        pipeline.generate("   ", 1).await,
        Err(Error::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let pipeline = ImagePipeline::with_services(PipelineServices {
        enhancer: PromptEnhancer::disabled(),
        tiers: vec![Box::new(StockTier::new(STOCK))],
        placeholder: PlaceholderSource::new(PLACEHOLDER),
    });

    let (a, b) = tokio::join!(
        pipeline.generate("business lunch", 2),
        pipeline.generate("park bench", 3)
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.image_references, StockTier::new(STOCK).references("business lunch", 2));
    assert_eq!(b.image_references, StockTier::new(STOCK).references("park bench", 3));
}

#[tokio::test]
async fn test_result_converts_into_persistable_record() {
    let pipeline = ImagePipeline::with_services(PipelineServices {
        enhancer: PromptEnhancer::new(Box::new(
            MockChatClient::new().with_response("A crisp studio portrait".to_string()),
        )),
        tiers: vec![Box::new(PrimaryTier::new(
            Box::new(MockImageGenerationClient::new()),
            StockTier::new(STOCK),
        ))],
        placeholder: PlaceholderSource::new(PLACEHOLDER),
    });

    let result = pipeline.generate("portrait", 2).await.unwrap();
    let record = GenerationRecord::from_result("portrait", result, Some("people".to_string()));

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["original_prompt"], "portrait");
    assert_eq!(json["enhanced_prompt"], "A crisp studio portrait");
    assert_eq!(json["category"], "people");
    assert_eq!(json["image_urls"].as_array().unwrap().len(), 2);
}

#[test]
fn test_config_without_keys_disables_ai_tiers() {
    let vars: HashMap<String, String> = HashMap::new();
    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

    assert!(!config.primary_provider_available);
    assert!(!config.enhancement_available);
    assert_eq!(
        ImagePipeline::from_config(&config).tier_names(),
        vec!["primary", "secondary", "stock"]
    );
}
