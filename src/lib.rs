//! # Nutrition OCR
//!
//! Turns a photographed nutrition facts panel into a structured nutrient
//! record: text recognition across two interchangeable engines with
//! failure-class-aware fallback, deterministic extraction of typed nutrient
//! fields from the recognized text, and per-serving aggregation across a
//! day's entries.

pub mod aggregation;
pub mod config;
pub mod engine;
pub mod errors;
pub mod image_input;
pub mod instance_manager;
pub mod label_extractor;
pub mod local_engine;
pub mod orchestrator;
pub mod pipeline;
pub mod recognition_errors;
pub mod record;
pub mod remote_engine;
pub mod store;

// Re-export types for easier access
pub use aggregation::{summarize, summarize_day, DaySummary};
pub use engine::{EngineKind, RecognitionResult, TextRecognitionEngine};
pub use image_input::LabelImage;
pub use label_extractor::{NutrientFieldExtractor, ParsedLabel};
pub use orchestrator::RecognitionOrchestrator;
pub use pipeline::LabelPipeline;
pub use recognition_errors::RecognitionError;
pub use record::{NutrientRecord, Nutrients};
pub use store::{MemoryStore, RecordStore};
