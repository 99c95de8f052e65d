//! # Capture Pipeline Tests
//!
//! End-to-end tests of the capture flow with stub engines: recognized text
//! flows through extraction into a draft record, failures surface as final
//! classified errors, and the quality gate reflects what was extracted.

use std::sync::Arc;

use async_trait::async_trait;
use nutrition_ocr::config::{RecognitionConfig, RemoteEngineConfig};
use nutrition_ocr::engine::{EngineKind, TextRecognitionEngine};
use nutrition_ocr::image_input::LabelImage;
use nutrition_ocr::orchestrator::RecognitionOrchestrator;
use nutrition_ocr::pipeline::LabelPipeline;
use nutrition_ocr::recognition_errors::RecognitionError;

/// Minimal valid 2x2 24-bit BMP for exercising the pipeline without a real photo
fn tiny_bmp() -> Vec<u8> {
    let width: i32 = 2;
    let height: i32 = 2;
    let row_bytes = 8u32;
    let pixel_bytes = row_bytes * height as u32;
    let file_size = 54 + pixel_bytes;

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&54u32.to_le_bytes());
    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_bytes.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&vec![0xFFu8; pixel_bytes as usize]);
    bytes
}

fn test_image() -> LabelImage {
    LabelImage::from_bytes(tiny_bmp(), 10 * 1024 * 1024).expect("test image should validate")
}

struct FixedEngine {
    kind: EngineKind,
    result: Result<&'static str, RecognitionError>,
}

#[async_trait]
impl TextRecognitionEngine for FixedEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    async fn recognize(&self, _image: &LabelImage) -> Result<String, RecognitionError> {
        self.result.clone().map(str::to_string)
    }
}

fn pipeline_with(
    remote: Result<&'static str, RecognitionError>,
    local: Result<&'static str, RecognitionError>,
) -> LabelPipeline {
    let remote_engine = Arc::new(FixedEngine {
        kind: EngineKind::Remote,
        result: remote,
    });
    let local_engine = Arc::new(FixedEngine {
        kind: EngineKind::Local,
        result: local,
    });
    let config = RecognitionConfig {
        remote: RemoteEngineConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    LabelPipeline::new(RecognitionOrchestrator::new(
        remote_engine,
        local_engine,
        config,
    ))
}

#[tokio::test]
async fn test_recognized_text_becomes_draft_record() {
    let pipeline = pipeline_with(
        Ok("Serving Size: 1 cup\nCalories 230\nTotal Fat 8g\nProtein 3g"),
        Ok("unused"),
    );

    let record = pipeline.process(&test_image()).await.unwrap();

    assert!(!record.id.is_empty());
    assert_eq!(record.product_name, "");
    assert_eq!(record.servings_consumed, 1.0);
    assert_eq!(record.serving_size.as_deref(), Some("1 cup"));
    assert_eq!(record.nutrients.calories, Some(230.0));
    assert_eq!(record.nutrients.total_fat, Some(8.0));
    assert_eq!(record.nutrients.protein, Some(3.0));
    assert_eq!(
        record.raw_ocr_text.as_deref(),
        Some("Serving Size: 1 cup\nCalories 230\nTotal Fat 8g\nProtein 3g")
    );
    assert!(record.has_usable_data());
}

#[tokio::test]
async fn test_each_capture_gets_a_fresh_id() {
    let pipeline = pipeline_with(Ok("Calories 100"), Ok("unused"));
    let image = test_image();

    let first = pipeline.process(&image).await.unwrap();
    let second = pipeline.process(&image).await.unwrap();

    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_unparseable_text_still_yields_a_record() {
    // Recognition succeeded but the text carries no nutrition fields; the
    // caller sees a record that fails the quality gate, not an error
    let pipeline = pipeline_with(Ok("TOTALLY ILLEGIBLE SMUDGE"), Ok("unused"));

    let record = pipeline.process(&test_image()).await.unwrap();

    assert_eq!(record.nutrients.present_count(), 0);
    assert_eq!(record.raw_ocr_text.as_deref(), Some("TOTALLY ILLEGIBLE SMUDGE"));
    assert!(!record.has_usable_data());
}

#[tokio::test]
async fn test_terminal_failure_surfaces_as_recognition_error() {
    let pipeline = pipeline_with(
        Err(RecognitionError::NoUsableText("blurry".to_string())),
        Ok("unused"),
    );

    let err = pipeline.process(&test_image()).await.unwrap_err();
    assert!(err.to_string().contains("[RECOGNITION]"));
    assert!(err.to_string().contains("blurry"));
}

#[tokio::test]
async fn test_fallback_result_flows_through_extraction() {
    let pipeline = pipeline_with(
        Err(RecognitionError::Transport("connection refused".to_string())),
        Ok("Calories 180\nProtein 5g"),
    );

    let record = pipeline.process(&test_image()).await.unwrap();

    assert_eq!(record.nutrients.calories, Some(180.0));
    assert_eq!(record.nutrients.protein, Some(5.0));
    assert!(record.has_usable_data());
}

#[tokio::test]
async fn test_per_call_engine_override() {
    let pipeline = pipeline_with(Ok("Calories 100"), Ok("Calories 999"));

    let record = pipeline
        .process_with(&test_image(), EngineKind::Local)
        .await
        .unwrap();

    assert_eq!(record.nutrients.calories, Some(999.0));
}
