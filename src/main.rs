use std::sync::Arc;

use anyhow::{Context, Result};
use nutrition_ocr::config::AppConfig;
use nutrition_ocr::engine::EngineKind;
use nutrition_ocr::image_input::LabelImage;
use nutrition_ocr::local_engine::LocalOcrEngine;
use nutrition_ocr::orchestrator::RecognitionOrchestrator;
use nutrition_ocr::pipeline::LabelPipeline;
use nutrition_ocr::remote_engine::RemoteOcrEngine;
use tracing::{info, warn};

/// Parse command-line arguments: an image path and an optional
/// `--engine remote|local` per-call override
fn parse_args() -> Result<(String, Option<EngineKind>)> {
    let mut image_path = None;
    let mut engine = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--engine" => {
                let value = args
                    .next()
                    .context("--engine requires a value (remote|local)")?;
                engine = Some(value.parse::<EngineKind>()?);
            }
            other => {
                if image_path.is_some() {
                    return Err(anyhow::anyhow!("unexpected argument: {}", other));
                }
                image_path = Some(other.to_string());
            }
        }
    }

    let image_path =
        image_path.context("usage: nutrition-ocr <image-path> [--engine remote|local]")?;
    Ok((image_path, engine))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present, then set up structured logging
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let (image_path, engine_override) = parse_args()?;

    let config = AppConfig::from_env()?;
    config.validate()?;
    info!("{}", config.summary());

    let bytes = std::fs::read(&image_path)
        .with_context(|| format!("failed to read image file {}", image_path))?;
    let image = LabelImage::from_bytes(bytes, config.recognition.max_file_size)?;

    let remote = Arc::new(RemoteOcrEngine::new(config.recognition.remote.clone()));
    let local = Arc::new(LocalOcrEngine::new(config.recognition.local.clone()));

    // Preload the Tesseract language model so a fallback does not pay the
    // initialization cost mid-capture
    if let Err(e) = local.warm_up() {
        warn!(error = %e, "Local engine warm-up failed; fallback may be unavailable");
    }

    let orchestrator = RecognitionOrchestrator::new(remote, local, config.recognition.clone());
    let pipeline = LabelPipeline::new(orchestrator);

    let record = match engine_override {
        Some(kind) => pipeline.process_with(&image, kind).await?,
        None => pipeline.process(&image).await?,
    };

    if !record.has_usable_data() {
        warn!("Could not extract enough nutrition data; edit the record manually or retake the photo");
    }

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
