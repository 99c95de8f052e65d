//! # Recognition Orchestrator
//!
//! This module selects a recognition engine for each capture, bounds the
//! primary attempt with a deadline, classifies failures, and performs at
//! most one fallback hop to the local engine. Engine selection is local to
//! the call: a transient fallback never changes the configured default for
//! subsequent calls.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::RecognitionConfig;
use crate::engine::{EngineKind, RecognitionResult, TextRecognitionEngine};
use crate::image_input::LabelImage;
use crate::recognition_errors::RecognitionError;

/// Orchestrates the primary recognition attempt and the single fallback hop
///
/// The primary call runs under the configured deadline, the only
/// cancellation point in the pipeline. The fallback call has no externally
/// imposed deadline; the local engine is a bounded-cost computation and is
/// expected to run to completion.
pub struct RecognitionOrchestrator {
    remote: Arc<dyn TextRecognitionEngine>,
    local: Arc<dyn TextRecognitionEngine>,
    config: RecognitionConfig,
}

impl RecognitionOrchestrator {
    pub fn new(
        remote: Arc<dyn TextRecognitionEngine>,
        local: Arc<dyn TextRecognitionEngine>,
        config: RecognitionConfig,
    ) -> Self {
        Self {
            remote,
            local,
            config,
        }
    }

    fn engine_for(&self, kind: EngineKind) -> &Arc<dyn TextRecognitionEngine> {
        match kind {
            EngineKind::Remote => &self.remote,
            EngineKind::Local => &self.local,
        }
    }

    /// Extract text using the configured default engine
    pub async fn extract_text(
        &self,
        image: &LabelImage,
    ) -> Result<RecognitionResult, RecognitionError> {
        self.extract_text_with(image, self.config.default_engine)
            .await
    }

    /// Extract text with an explicit engine choice for this call only.
    ///
    /// Fails only when all attempted engines fail. The override never
    /// changes the configured default for later calls.
    pub async fn extract_text_with(
        &self,
        image: &LabelImage,
        primary: EngineKind,
    ) -> Result<RecognitionResult, RecognitionError> {
        let deadline = Duration::from_secs(self.config.operation_timeout_secs);
        let start = Instant::now();

        info!(engine = primary.as_str(), "Starting text recognition");

        let attempt = timeout(deadline, self.engine_for(primary).recognize(image)).await;
        let failure = match attempt {
            Ok(Ok(text)) => {
                info!(
                    engine = primary.as_str(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    chars = text.len(),
                    "Primary recognition succeeded"
                );
                return Ok(RecognitionResult {
                    text,
                    engine: primary,
                });
            }
            Ok(Err(err)) => err,
            Err(_) => RecognitionError::Timeout(format!(
                "recognition timed out after {} seconds",
                self.config.operation_timeout_secs
            )),
        };

        // Terminal failures propagate without a second pass: a bad-quality
        // image would not fare better on the slower local engine. A local
        // primary has nothing to fall back to.
        if !failure.is_retryable() || primary == EngineKind::Local {
            warn!(
                engine = primary.as_str(),
                error = %failure,
                "Recognition failed terminally"
            );
            return Err(failure);
        }

        warn!(
            engine = primary.as_str(),
            error = %failure,
            "Primary recognition failed, falling back to local engine"
        );

        match self.local.recognize(image).await {
            Ok(text) => {
                info!(
                    chars = text.len(),
                    total_ms = start.elapsed().as_millis() as u64,
                    "Fallback recognition succeeded"
                );
                Ok(RecognitionResult {
                    text,
                    engine: EngineKind::Local,
                })
            }
            Err(fallback_err) => {
                warn!(error = %fallback_err, "Fallback recognition also failed");
                Err(RecognitionError::BothEnginesFailed {
                    primary: failure.to_string(),
                    fallback: fallback_err.to_string(),
                })
            }
        }
    }
}
