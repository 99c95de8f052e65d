//! # Application Error Types
//!
//! This module defines common error types used throughout the nutrition-ocr
//! application. It provides structured error handling for the pipeline's
//! components.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Input validation errors (image buffers, arguments)
    Validation(String),
    /// Text recognition errors surfaced by the orchestrator
    Recognition(String),
    /// Record store errors
    Store(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::Recognition(msg) => write!(f, "[RECOGNITION] {}", msg),
            AppError::Store(msg) => write!(f, "[STORE] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<crate::recognition_errors::RecognitionError> for AppError {
    fn from(err: crate::recognition_errors::RecognitionError) -> Self {
        AppError::Recognition(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::error;

    /// Log recognition failures with engine and timing context
    pub fn log_recognition_error(
        error: &impl std::fmt::Display,
        operation: &str,
        engine: Option<&str>,
        processing_duration: Option<std::time::Duration>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            engine = ?engine,
            processing_duration_ms = ?processing_duration.map(|d| d.as_millis()),
            "Text recognition failed"
        );
    }

    /// Log record store errors with operation context
    pub fn log_store_error(
        error: &impl std::fmt::Display,
        operation: &str,
        record_id: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            record_id = ?record_id,
            "Record store operation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}
