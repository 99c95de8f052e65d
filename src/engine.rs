//! # Text Recognition Engine Interface
//!
//! This module defines the common interface implemented by the remote and
//! local recognition engines, plus the engine identity and result types
//! shared with the orchestrator. Engines convert an image buffer into raw
//! text; deadlines and fallback policy are owned by the orchestrator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::image_input::LabelImage;
use crate::recognition_errors::RecognitionError;

/// Identifies which recognition backend handled a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Hosted HTTP recognition service (higher accuracy, network-dependent)
    Remote,
    /// Embedded Tesseract engine (offline, used as the fallback)
    Local,
}

impl EngineKind {
    /// Short name for logging and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Remote => "remote",
            EngineKind::Local => "local",
        }
    }
}

impl std::str::FromStr for EngineKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" | "ocrspace" => Ok(EngineKind::Remote),
            "local" | "tesseract" => Ok(EngineKind::Local),
            other => Err(AppError::Config(format!(
                "unknown recognition engine '{}' (expected 'remote' or 'local')",
                other
            ))),
        }
    }
}

/// Outcome of a successful recognition attempt: the raw text plus which
/// engine produced it. Consumed immediately by the extractor, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub text: String,
    pub engine: EngineKind,
}

/// Common contract for text recognition backends.
///
/// Implementations are treated as untrusted and possibly slow or
/// unavailable; the engine boundary is the unit of fault isolation.
#[async_trait]
pub trait TextRecognitionEngine: Send + Sync {
    /// Which backend this engine is
    fn kind(&self) -> EngineKind;

    /// Recognize text in the given image, returning the raw text
    async fn recognize(&self, image: &LabelImage) -> Result<String, RecognitionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_kind_parsing() {
        assert_eq!("remote".parse::<EngineKind>().unwrap(), EngineKind::Remote);
        assert_eq!("Local".parse::<EngineKind>().unwrap(), EngineKind::Local);
        assert_eq!(
            "ocrspace".parse::<EngineKind>().unwrap(),
            EngineKind::Remote
        );
        assert_eq!(
            "tesseract".parse::<EngineKind>().unwrap(),
            EngineKind::Local
        );
        assert!("carrier-pigeon".parse::<EngineKind>().is_err());
    }
}
