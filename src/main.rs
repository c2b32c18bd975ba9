// Command line entry point for the product photo edit pipeline
//
// Usage: retouch <input> <output> <prompt> [negative_prompt] [seed]

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use product_retouch::{
    Config, EditPipeline, GenerativeEditClient, SegmentationClient, TranslationClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse args
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "Usage: {} <input.png> <output.png> <prompt> [negative_prompt] [seed]",
            args[0]
        );
        std::process::exit(1);
    }

    let input_path = PathBuf::from(&args[1]);
    let output_path = PathBuf::from(&args[2]);
    let prompt = args[3].clone();
    let negative_prompt = args.get(4).cloned().unwrap_or_default();
    let seed: u64 = match args.get(5) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("seed must be a non-negative integer, got {raw}"))?,
        None => 0,
    };

    // Load configuration
    let config = Config::new().context("Failed to load configuration")?;

    // Initialize logging
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new(format!(
        "product_retouch={}",
        match config.log_level {
            tracing::Level::TRACE => "trace",
            tracing::Level::DEBUG => "debug",
            tracing::Level::INFO => "info",
            tracing::Level::WARN => "warn",
            tracing::Level::ERROR => "error",
        }
    ));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Input: {}", input_path.display());
    info!("Output: {}", output_path.display());

    // Build service clients from configuration
    let segmenter = SegmentationClient::new(&config)?;
    let translator = TranslationClient::new(&config)?;
    let generator = GenerativeEditClient::new(translator, &config)?;

    let pipeline = EditPipeline::new(segmenter, generator, &config);
    pipeline
        .run(&input_path, &output_path, &prompt, &negative_prompt, seed)
        .await?;

    Ok(())
}
