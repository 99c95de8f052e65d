//! # Unified Application Configuration
//!
//! This module provides a centralized configuration system for the
//! recognition pipeline. It supports loading from environment variables,
//! validation, and provides a clean interface for accessing configuration
//! throughout the application.

use std::env;

use serde::{Deserialize, Serialize};

use crate::engine::EngineKind;
use crate::errors::{AppError, AppResult};

// Constants for recognition configuration
pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://api.ocr.space/parse/image";
pub const DEFAULT_REMOTE_LANGUAGE: &str = "eng";
pub const DEFAULT_TESSERACT_LANGUAGES: &str = "eng";
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 30;
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB limit for image buffers

/// Remote recognition service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEngineConfig {
    /// Endpoint of the hosted recognition service
    pub endpoint: String,
    /// API key sent with each request
    pub api_key: String,
    /// Language hint passed to the service
    pub language: String,
}

impl Default for RemoteEngineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_REMOTE_ENDPOINT.to_string(),
            api_key: String::new(),
            language: DEFAULT_REMOTE_LANGUAGE.to_string(),
        }
    }
}

impl RemoteEngineConfig {
    /// Validate remote engine configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(AppError::Config(
                "remote endpoint cannot be empty".to_string(),
            ));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(AppError::Config(
                "remote endpoint must start with 'http://' or 'https://'".to_string(),
            ));
        }
        if self.language.trim().is_empty() {
            return Err(AppError::Config(
                "remote language hint cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Embedded Tesseract engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalEngineConfig {
    /// Tesseract language codes (e.g., "eng", "eng+fra")
    pub languages: String,
    /// Override for the tessdata directory; system default when unset
    pub tessdata_dir: Option<String>,
}

impl Default for LocalEngineConfig {
    fn default() -> Self {
        Self {
            languages: DEFAULT_TESSERACT_LANGUAGES.to_string(),
            tessdata_dir: None,
        }
    }
}

impl LocalEngineConfig {
    /// Validate local engine configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.languages.trim().is_empty() {
            return Err(AppError::Config(
                "tesseract languages cannot be empty".to_string(),
            ));
        }
        if let Some(dir) = &self.tessdata_dir {
            if dir.trim().is_empty() {
                return Err(AppError::Config(
                    "tessdata_dir cannot be empty if provided".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Configuration for the recognition orchestrator and its engines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Engine tried first on each capture; per-call overrides never change this
    pub default_engine: EngineKind,
    /// Deadline for the primary recognition attempt in seconds
    pub operation_timeout_secs: u64,
    /// Maximum allowed image buffer size in bytes
    pub max_file_size: u64,
    /// Remote service settings
    pub remote: RemoteEngineConfig,
    /// Embedded engine settings
    pub local: LocalEngineConfig,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            default_engine: EngineKind::Remote,
            operation_timeout_secs: DEFAULT_OPERATION_TIMEOUT_SECS,
            max_file_size: MAX_FILE_SIZE,
            remote: RemoteEngineConfig::default(),
            local: LocalEngineConfig::default(),
        }
    }
}

impl RecognitionConfig {
    /// Validate recognition configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if self.operation_timeout_secs == 0 {
            return Err(AppError::Config(
                "operation_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.operation_timeout_secs > 300 {
            return Err(AppError::Config(
                "operation_timeout_secs cannot be greater than 300 seconds".to_string(),
            ));
        }
        if self.max_file_size == 0 {
            return Err(AppError::Config(
                "max_file_size must be greater than 0".to_string(),
            ));
        }

        self.remote.validate()?;
        self.local.validate()?;

        // An api key is only required when the remote engine can be selected
        // as the primary
        if self.default_engine == EngineKind::Remote && self.remote.api_key.trim().is_empty() {
            return Err(AppError::Config(
                "remote api_key is required when the default engine is 'remote'".to_string(),
            ));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Recognition pipeline configuration
    pub recognition: RecognitionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        config.recognition.default_engine = env::var("OCR_PROVIDER")
            .unwrap_or_else(|_| "remote".to_string())
            .parse()?;
        config.recognition.operation_timeout_secs = env::var("OCR_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_OPERATION_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("OCR_TIMEOUT_SECS must be a valid number".to_string())
            })?;
        config.recognition.max_file_size = env::var("OCR_MAX_FILE_SIZE")
            .unwrap_or_else(|_| MAX_FILE_SIZE.to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("OCR_MAX_FILE_SIZE must be a valid number".to_string())
            })?;

        config.recognition.remote.endpoint =
            env::var("OCR_ENDPOINT").unwrap_or_else(|_| DEFAULT_REMOTE_ENDPOINT.to_string());
        config.recognition.remote.api_key = env::var("OCRSPACE_API_KEY").unwrap_or_default();
        config.recognition.remote.language =
            env::var("OCR_LANGUAGE").unwrap_or_else(|_| DEFAULT_REMOTE_LANGUAGE.to_string());

        config.recognition.local.languages = env::var("TESSERACT_LANGUAGES")
            .unwrap_or_else(|_| DEFAULT_TESSERACT_LANGUAGES.to_string());
        config.recognition.local.tessdata_dir = env::var("TESSDATA_DIR").ok();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.recognition.validate()?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: default_engine={}, endpoint={}, api_key=[REDACTED], timeout_secs={}, max_file_size={}, tesseract_languages={}",
            self.recognition.default_engine.as_str(),
            self.recognition.remote.endpoint,
            self.recognition.operation_timeout_secs,
            self.recognition.max_file_size,
            self.recognition.local.languages
        )
    }
}
