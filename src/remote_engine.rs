//! # Remote Recognition Engine
//!
//! HTTP adapter for the hosted recognition service. The service takes a
//! multipart upload with a language hint and answers with parsed text per
//! image region. The service is treated as untrusted and possibly slow or
//! unavailable; the deadline on a request is imposed by the orchestrator.

use async_trait::async_trait;
use image::ImageFormat;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::RemoteEngineConfig;
use crate::engine::{EngineKind, TextRecognitionEngine};
use crate::image_input::LabelImage;
use crate::recognition_errors::RecognitionError;

/// Wire shape of the remote service response
#[derive(Debug, Clone, Deserialize)]
struct RemoteOcrResponse {
    #[serde(rename = "ParsedResults", default)]
    parsed_results: Vec<RemoteParsedResult>,
    #[serde(rename = "IsErroredOnProcessing", default)]
    is_errored_on_processing: bool,
    #[serde(rename = "ErrorMessage", default)]
    error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RemoteParsedResult {
    #[serde(rename = "ParsedText", default)]
    parsed_text: String,
    #[serde(rename = "ErrorMessage", default)]
    error_message: Option<String>,
}

/// Recognition engine backed by the hosted HTTP service
pub struct RemoteOcrEngine {
    config: RemoteEngineConfig,
    client: reqwest::Client,
}

impl RemoteOcrEngine {
    pub fn new(config: RemoteEngineConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn build_form(&self, image: &LabelImage) -> Form {
        let file_name = match image.format() {
            ImageFormat::Png => "label.png",
            ImageFormat::Jpeg => "label.jpg",
            ImageFormat::Bmp => "label.bmp",
            _ => "label.tif",
        };
        let file_part = Part::bytes(image.bytes().to_vec()).file_name(file_name);

        Form::new()
            .text("apikey", self.config.api_key.clone())
            .text("language", self.config.language.clone())
            .text("isOverlayRequired", "false")
            .text("detectOrientation", "true")
            .text("scale", "true")
            .text("OCREngine", "2")
            .part("file", file_part)
    }
}

#[async_trait]
impl TextRecognitionEngine for RemoteOcrEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Remote
    }

    async fn recognize(&self, image: &LabelImage) -> Result<String, RecognitionError> {
        let start = std::time::Instant::now();
        debug!(
            endpoint = %self.config.endpoint,
            size_bytes = image.bytes().len(),
            "Sending remote recognition request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(self.build_form(image))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RecognitionError::Timeout(format!("remote recognition request timed out: {}", e))
                } else {
                    RecognitionError::Transport(format!("remote recognition request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Remote recognition service returned error status");
            return Err(RecognitionError::Transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            )));
        }

        let body: RemoteOcrResponse = response.json().await.map_err(|e| {
            RecognitionError::MalformedResponse(format!(
                "could not decode remote recognition response: {}",
                e
            ))
        })?;

        // An explicit processing error is terminal: the service saw the
        // image and could not read it, so a slower local pass will not help
        if body.is_errored_on_processing {
            let reason = body
                .error_message
                .or_else(|| {
                    body.parsed_results
                        .iter()
                        .find_map(|r| r.error_message.clone())
                })
                .unwrap_or_else(|| "remote recognition reported a processing error".to_string());
            return Err(RecognitionError::NoUsableText(reason));
        }

        let text = body
            .parsed_results
            .into_iter()
            .map(|r| r.parsed_text)
            .find(|t| !t.trim().is_empty());

        match text {
            Some(text) => {
                info!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    chars = text.len(),
                    "Remote recognition completed"
                );
                Ok(text)
            }
            None => Err(RecognitionError::NoUsableText(
                "no text recognized in image".to_string(),
            )),
        }
    }
}
