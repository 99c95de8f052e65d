//! # Local Recognition Engine
//!
//! Embedded Tesseract adapter, used as the offline fallback or as the
//! primary when configured. Requires a one-time language model load before
//! first use, handled by the instance manager; `warm_up` preloads it so the
//! first capture does not pay the initialization cost.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::LocalEngineConfig;
use crate::engine::{EngineKind, TextRecognitionEngine};
use crate::image_input::LabelImage;
use crate::instance_manager::OcrInstanceManager;
use crate::recognition_errors::RecognitionError;

/// Tesseract-backed recognition engine reading images from memory
pub struct LocalOcrEngine {
    config: LocalEngineConfig,
    manager: OcrInstanceManager,
}

impl LocalOcrEngine {
    pub fn new(config: LocalEngineConfig) -> Self {
        Self {
            config,
            manager: OcrInstanceManager::new(),
        }
    }

    /// Preload the language model so the first recognition call is fast
    pub fn warm_up(&self) -> anyhow::Result<()> {
        self.manager.get_instance(&self.config).map(|_| ())
    }
}

/// Normalize raw Tesseract output: trim lines and drop empty ones
fn clean_recognized_text(raw: &str) -> String {
    raw.trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join("\n")
}

#[async_trait]
impl TextRecognitionEngine for LocalOcrEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Local
    }

    async fn recognize(&self, image: &LabelImage) -> Result<String, RecognitionError> {
        let start = std::time::Instant::now();

        // Initialization failure means the engine is unavailable, not that
        // the image lacks text
        let instance = self.manager.get_instance(&self.config).map_err(|e| {
            RecognitionError::Transport(format!("local engine initialization failed: {}", e))
        })?;

        let raw = {
            let mut tess = instance
                .lock()
                .expect("Failed to acquire Tesseract instance lock");
            tess.set_image_from_mem(image.bytes()).map_err(|e| {
                RecognitionError::NoUsableText(format!(
                    "failed to load image into Tesseract: {}",
                    e
                ))
            })?;

            tess.get_utf8_text().map_err(|e| {
                RecognitionError::NoUsableText(format!("Tesseract extraction failed: {}", e))
            })?
        };

        let text = clean_recognized_text(&raw);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if text.is_empty() {
            warn!(elapsed_ms, "Local recognition produced no text");
            return Err(RecognitionError::NoUsableText(
                "no text recognized in image".to_string(),
            ));
        }

        info!(elapsed_ms, chars = text.len(), "Local recognition completed");
        Ok(text)
    }
}
