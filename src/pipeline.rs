//! # Label Capture Pipeline
//!
//! End-to-end flow for one capture: recognize text from the image,
//! extract nutrient fields, and assemble a draft record for review. The
//! pipeline holds exactly one record in flight per capture and never
//! writes to the store; persisting the reviewed record is the caller's
//! responsibility.

use chrono::Utc;
use tracing::{info, warn};

use crate::engine::{EngineKind, RecognitionResult};
use crate::errors::{error_logging, AppResult};
use crate::image_input::LabelImage;
use crate::label_extractor::NutrientFieldExtractor;
use crate::orchestrator::RecognitionOrchestrator;
use crate::record::NutrientRecord;

/// Capture pipeline: recognition orchestration plus field extraction
pub struct LabelPipeline {
    orchestrator: RecognitionOrchestrator,
    extractor: NutrientFieldExtractor,
}

impl LabelPipeline {
    pub fn new(orchestrator: RecognitionOrchestrator) -> Self {
        Self {
            orchestrator,
            extractor: NutrientFieldExtractor::new(),
        }
    }

    /// Process one captured image into a draft record using the configured
    /// default engine.
    ///
    /// On success the caller consults [`NutrientRecord::has_usable_data`]
    /// to decide between review and a retake prompt; on failure the error
    /// is a final, classified recognition failure.
    pub async fn process(&self, image: &LabelImage) -> AppResult<NutrientRecord> {
        let recognition = self.orchestrator.extract_text(image).await.map_err(|e| {
            error_logging::log_recognition_error(&e, "process_capture", None, None);
            crate::errors::AppError::from(e)
        })?;
        Ok(self.assemble(recognition))
    }

    /// Process one captured image with an explicit engine choice for this
    /// call only
    pub async fn process_with(
        &self,
        image: &LabelImage,
        engine: EngineKind,
    ) -> AppResult<NutrientRecord> {
        let recognition = self
            .orchestrator
            .extract_text_with(image, engine)
            .await
            .map_err(|e| {
                error_logging::log_recognition_error(
                    &e,
                    "process_capture",
                    Some(engine.as_str()),
                    None,
                );
                crate::errors::AppError::from(e)
            })?;
        Ok(self.assemble(recognition))
    }

    fn assemble(&self, recognition: RecognitionResult) -> NutrientRecord {
        let parsed = self.extractor.parse(&recognition.text);

        if !parsed.has_usable_data() {
            warn!(
                engine = recognition.engine.as_str(),
                "Extraction found too few fields; manual correction or retake required"
            );
        }

        let mut record = NutrientRecord::new(Utc::now());
        record.raw_ocr_text = Some(parsed.raw_text);
        record.serving_size = parsed.serving_size;
        record.servings_per_container = parsed.servings_per_container;
        record.nutrients = parsed.nutrients;

        info!(
            id = %record.id,
            engine = recognition.engine.as_str(),
            fields = record.nutrients.present_count(),
            "Draft record assembled"
        );
        record
    }
}
