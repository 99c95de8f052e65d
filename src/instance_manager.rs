//! # OCR Instance Manager Module
//!
//! This module provides thread-safe management of reusable Tesseract
//! instances. Loading a language model is the expensive, one-time part of
//! local recognition, so instances are created once per language
//! configuration and shared across recognitions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use leptess::LepTess;
use tracing::info;

use crate::config::LocalEngineConfig;

/// Thread-safe pool of Tesseract instances keyed by language configuration
///
/// The first request for a language combination pays the model-load cost
/// (typically 100-500ms); subsequent requests return the cached instance.
/// Instances persist until the manager is dropped.
pub struct OcrInstanceManager {
    instances: Mutex<HashMap<String, Arc<Mutex<LepTess>>>>,
}

impl OcrInstanceManager {
    /// Create a new, empty instance manager
    pub fn new() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Get or create the Tesseract instance for the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if Tesseract initialization fails (e.g., missing
    /// language data files or invalid language codes)
    pub fn get_instance(&self, config: &LocalEngineConfig) -> anyhow::Result<Arc<Mutex<LepTess>>> {
        let key = config.languages.clone();

        // Try to get an existing instance
        {
            let instances = self
                .instances
                .lock()
                .expect("Failed to acquire instances lock");
            if let Some(instance) = instances.get(&key) {
                return Ok(Arc::clone(instance));
            }
        }

        info!(languages = %config.languages, "Loading new Tesseract instance");

        let tess = LepTess::new(config.tessdata_dir.as_deref(), &config.languages)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Tesseract instance: {}", e))?;

        let instance = Arc::new(Mutex::new(tess));
        let mut instances = self
            .instances
            .lock()
            .expect("Failed to acquire instances lock");
        instances.insert(key, Arc::clone(&instance));
        Ok(instance)
    }

    /// Number of cached instances (for diagnostics)
    pub fn instance_count(&self) -> usize {
        self.instances
            .lock()
            .expect("Failed to acquire instances lock")
            .len()
    }
}

impl Default for OcrInstanceManager {
    fn default() -> Self {
        Self::new()
    }
}
