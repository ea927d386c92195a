use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use stockly_images::app::ImagePipeline;
use stockly_images::models::{Config, GenerationRecord, DEFAULT_IMAGE_COUNT, MAX_IMAGES_PER_REQUEST};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "stockly-images")]
#[command(about = "Generate images for a text prompt")]
struct CliArgs {
    /// Text prompt describing the desired image.
    #[arg(value_name = "PROMPT")]
    prompt: String,

    /// Number of images to produce.
    #[arg(short = 'n', long, default_value_t = DEFAULT_IMAGE_COUNT, value_parser = parse_count_arg)]
    count: usize,

    /// Optional category label stored with the record.
    #[arg(long)]
    category: Option<String>,

    /// Directory to write the generation record into as `<id>.json`.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

fn parse_count_arg(input: &str) -> std::result::Result<usize, String> {
    let count: usize = input
        .parse()
        .map_err(|_| format!("Invalid count '{}'. Expected a number", input))?;
    if (1..=MAX_IMAGES_PER_REQUEST).contains(&count) {
        Ok(count)
    } else {
        Err(format!(
            "Count must be between 1 and {}",
            MAX_IMAGES_PER_REQUEST
        ))
    }
}

fn write_record(dir: &Path, record: &GenerationRecord, json: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let path = dir.join(format!("{}.json", record.id));
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockly_images=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pipeline = ImagePipeline::from_config(&config);
    info!("Tier order: {}", pipeline.tier_names().join(" -> "));

    let result = match pipeline.generate(&args.prompt, args.count).await {
        Ok(result) => result,
        Err(e) => {
            error!("Generation failed: {}", e);
            std::process::exit(1);
        }
    };

    let record = GenerationRecord::from_result(&args.prompt, result, args.category);
    let json = serde_json::to_string_pretty(&record)?;

    if let Some(dir) = &args.output_dir {
        let path = write_record(dir, &record, &json)?;
        info!("Saved generation record at: {}", path.display());
    }

    println!("{}", json);
    Ok(())
}
