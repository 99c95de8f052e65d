//! # Recognition Orchestrator Tests
//!
//! Test suite for engine selection, the primary deadline, failure-class
//! driven fallback, and the single-fallback-hop guarantee, using stub
//! engines with controllable behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nutrition_ocr::config::RecognitionConfig;
use nutrition_ocr::engine::{EngineKind, TextRecognitionEngine};
use nutrition_ocr::image_input::LabelImage;
use nutrition_ocr::orchestrator::RecognitionOrchestrator;
use nutrition_ocr::recognition_errors::RecognitionError;

/// Minimal valid 2x2 24-bit BMP for exercising the pipeline without a real photo
fn tiny_bmp() -> Vec<u8> {
    let width: i32 = 2;
    let height: i32 = 2;
    let row_bytes = 8u32; // 2 pixels * 3 bytes, padded to 4-byte boundary
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

#[derive(Clone)]
enum Behavior {
    Succeed(&'static str),
    Fail(RecognitionError),
    Hang,
}

/// Stub engine with scripted behavior and a call counter
struct StubEngine {
    kind: EngineKind,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TextRecognitionEngine for StubEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    async fn recognize(&self, _image: &LabelImage) -> Result<String, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Succeed(text) => Ok((*text).to_string()),
            Behavior::Fail(err) => Err(err.clone()),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(RecognitionError::NoUsableText("unreachable".to_string()))
            }
        }
    }
}

/// Build an orchestrator with scripted remote and local engines, returning
/// the per-engine call counters
fn orchestrator(
    remote: Behavior,
    local: Behavior,
) -> (RecognitionOrchestrator, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let remote_calls = Arc::new(AtomicUsize::new(0));
    let local_calls = Arc::new(AtomicUsize::new(0));

    let remote_engine = Arc::new(StubEngine {
        kind: EngineKind::Remote,
        behavior: remote,
        calls: Arc::clone(&remote_calls),
    });
    let local_engine = Arc::new(StubEngine {
        kind: EngineKind::Local,
        behavior: local,
        calls: Arc::clone(&local_calls),
    });

    let config = RecognitionConfig {
        remote: nutrition_ocr::config::RemoteEngineConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    (
        RecognitionOrchestrator::new(remote_engine, local_engine, config),
        remote_calls,
        local_calls,
    )
}

#[tokio::test]
async fn test_primary_success_uses_no_fallback() {
    let (orchestrator, remote_calls, local_calls) =
        orchestrator(Behavior::Succeed("Calories 230"), Behavior::Succeed("x"));

    let result = orchestrator.extract_text(&test_image()).await.unwrap();

    assert_eq!(result.text, "Calories 230");
    assert_eq!(result.engine, EngineKind::Remote);
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    assert_eq!(local_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_triggers_exactly_one_fallback() {
    let (orchestrator, remote_calls, local_calls) =
        orchestrator(Behavior::Hang, Behavior::Succeed("Protein 3g"));

    let result = orchestrator.extract_text(&test_image()).await.unwrap();

    assert_eq!(result.text, "Protein 3g");
    assert_eq!(result.engine, EngineKind::Local);
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transport_failure_falls_back() {
    let (orchestrator, remote_calls, local_calls) = orchestrator(
        Behavior::Fail(RecognitionError::Transport("HTTP 503".to_string())),
        Behavior::Succeed("Sodium 160mg"),
    );

    let result = orchestrator.extract_text(&test_image()).await.unwrap();

    assert_eq!(result.engine, EngineKind::Local);
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_no_text_is_terminal_without_fallback() {
    // A well-formed "no text" answer means the image is the problem; the
    // slower local pass must not run
    let (orchestrator, remote_calls, local_calls) = orchestrator(
        Behavior::Fail(RecognitionError::NoUsableText("blurry".to_string())),
        Behavior::Succeed("would succeed"),
    );

    let err = orchestrator.extract_text(&test_image()).await.unwrap_err();

    assert!(matches!(err, RecognitionError::NoUsableText(_)));
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    assert_eq!(local_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_response_is_terminal() {
    let (orchestrator, _, local_calls) = orchestrator(
        Behavior::Fail(RecognitionError::MalformedResponse("bad json".to_string())),
        Behavior::Succeed("would succeed"),
    );

    let err = orchestrator.extract_text(&test_image()).await.unwrap_err();

    assert!(matches!(err, RecognitionError::MalformedResponse(_)));
    assert_eq!(local_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_both_engines_failed_carries_both_messages() {
    let (orchestrator, remote_calls, local_calls) = orchestrator(
        Behavior::Fail(RecognitionError::Transport("connection refused".to_string())),
        Behavior::Fail(RecognitionError::NoUsableText("nothing legible".to_string())),
    );

    let err = orchestrator.extract_text(&test_image()).await.unwrap_err();

    match &err {
        RecognitionError::BothEnginesFailed { primary, fallback } => {
            assert!(primary.contains("connection refused"));
            assert!(fallback.contains("nothing legible"));
        }
        other => panic!("expected BothEnginesFailed, got {:?}", other),
    }
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_local_primary_never_falls_back() {
    let (orchestrator, remote_calls, local_calls) = orchestrator(
        Behavior::Succeed("would succeed"),
        Behavior::Fail(RecognitionError::Transport("model missing".to_string())),
    );

    let err = orchestrator
        .extract_text_with(&test_image(), EngineKind::Local)
        .await
        .unwrap_err();

    assert!(matches!(err, RecognitionError::Transport(_)));
    assert_eq!(remote_calls.load(Ordering::SeqCst), 0);
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_per_call_override_does_not_change_default() {
    let (orchestrator, remote_calls, local_calls) = orchestrator(
        Behavior::Succeed("remote text"),
        Behavior::Succeed("local text"),
    );
    let image = test_image();

    // Explicit local call for this capture only
    let result = orchestrator
        .extract_text_with(&image, EngineKind::Local)
        .await
        .unwrap();
    assert_eq!(result.engine, EngineKind::Local);

    // The configured default is still the remote engine
    let result = orchestrator.extract_text(&image).await.unwrap();
    assert_eq!(result.engine, EngineKind::Remote);

    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
}
