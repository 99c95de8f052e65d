//! # Recognition Error Types
//!
//! This module defines the failure taxonomy for text recognition. The split
//! between retryable and terminal failures drives the orchestrator's single
//! fallback hop: only network-shaped failures are worth a second pass on the
//! local engine.

/// Failure classes surfaced by recognition engines and the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionError {
    /// The primary engine exceeded its deadline
    Timeout(String),
    /// Network-layer or HTTP transport failure (connection error, non-2xx status)
    Transport(String),
    /// The engine responded but the payload could not be decoded
    MalformedResponse(String),
    /// A well-formed response carried no usable text
    NoUsableText(String),
    /// The local fallback also failed after a retryable primary failure
    BothEnginesFailed { primary: String, fallback: String },
}

impl RecognitionError {
    /// Whether this failure class should trigger the one-shot local fallback.
    ///
    /// Timeouts and transport failures are worth an offline second attempt.
    /// Everything else means the image itself did not yield text, and a
    /// slower, lower-accuracy pass must not be triggered silently.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RecognitionError::Timeout(_) | RecognitionError::Transport(_)
        )
    }
}

impl std::fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognitionError::Timeout(msg) => {
                write!(f, "[OCR_TIMEOUT] Recognition timed out: {}", msg)
            }
            RecognitionError::Transport(msg) => {
                write!(f, "[OCR_TRANSPORT] Recognition transport failed: {}", msg)
            }
            RecognitionError::MalformedResponse(msg) => {
                write!(f, "[OCR_MALFORMED] Recognition response malformed: {}", msg)
            }
            RecognitionError::NoUsableText(msg) => {
                write!(f, "[OCR_NO_TEXT] No usable text recognized: {}", msg)
            }
            RecognitionError::BothEnginesFailed { primary, fallback } => write!(
                f,
                "[OCR_BOTH_FAILED] Both recognition engines failed: primary: {}; fallback: {}",
                primary, fallback
            ),
        }
    }
}

impl std::error::Error for RecognitionError {}
