//! # Nutrient Record Data Model
//!
//! This module defines the core record type for one captured nutrition label,
//! plus the block of optional per-serving nutrient values shared with the
//! field extractor. All nutrient fields are independently optional: failing
//! to read one field never blocks populating the others.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Numeric label fields the extraction rule table can populate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Calories,
    TotalFat,
    SaturatedFat,
    TransFat,
    Cholesterol,
    Sodium,
    TotalCarb,
    DietaryFiber,
    TotalSugars,
    AddedSugars,
    Protein,
    VitaminD,
    Calcium,
    Iron,
    Potassium,
}

/// Per-serving nutrient values as printed on a label
///
/// Energy and mass fields carry the literal unit printed beside the value
/// (calories unitless, fats/carbohydrates/protein in grams, cholesterol and
/// sodium in milligrams); no unit conversion is performed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrients {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturated_fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_carb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_fiber: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_sugars: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_sugars: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitamin_d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calcium: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iron: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potassium: Option<f64>,
}

impl Nutrients {
    /// Read a field by tag
    pub fn get(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Calories => self.calories,
            NumericField::TotalFat => self.total_fat,
            NumericField::SaturatedFat => self.saturated_fat,
            NumericField::TransFat => self.trans_fat,
            NumericField::Cholesterol => self.cholesterol,
            NumericField::Sodium => self.sodium,
            NumericField::TotalCarb => self.total_carb,
            NumericField::DietaryFiber => self.dietary_fiber,
            NumericField::TotalSugars => self.total_sugars,
            NumericField::AddedSugars => self.added_sugars,
            NumericField::Protein => self.protein,
            NumericField::VitaminD => self.vitamin_d,
            NumericField::Calcium => self.calcium,
            NumericField::Iron => self.iron,
            NumericField::Potassium => self.potassium,
        }
    }

    /// Write a field by tag
    pub fn set(&mut self, field: NumericField, value: f64) {
        let slot = match field {
            NumericField::Calories => &mut self.calories,
            NumericField::TotalFat => &mut self.total_fat,
            NumericField::SaturatedFat => &mut self.saturated_fat,
            NumericField::TransFat => &mut self.trans_fat,
            NumericField::Cholesterol => &mut self.cholesterol,
            NumericField::Sodium => &mut self.sodium,
            NumericField::TotalCarb => &mut self.total_carb,
            NumericField::DietaryFiber => &mut self.dietary_fiber,
            NumericField::TotalSugars => &mut self.total_sugars,
            NumericField::AddedSugars => &mut self.added_sugars,
            NumericField::Protein => &mut self.protein,
            NumericField::VitaminD => &mut self.vitamin_d,
            NumericField::Calcium => &mut self.calcium,
            NumericField::Iron => &mut self.iron,
            NumericField::Potassium => &mut self.potassium,
        };
        *slot = Some(value);
    }

    /// Number of fields with a value
    pub fn present_count(&self) -> usize {
        [
            self.calories,
            self.total_fat,
            self.saturated_fat,
            self.trans_fat,
            self.cholesterol,
            self.sodium,
            self.total_carb,
            self.dietary_fiber,
            self.total_sugars,
            self.added_sugars,
            self.protein,
            self.vitamin_d,
            self.calcium,
            self.iron,
            self.potassium,
        ]
        .iter()
        .filter(|value| value.is_some())
        .count()
    }
}

fn default_servings() -> f64 {
    1.0
}

/// One captured nutrition label entry
///
/// Records are owned by the persistence layer and keyed by `id`; the
/// pipeline only ever holds one record in flight per capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientRecord {
    /// Opaque record identity, unique per capture
    pub id: String,
    /// Product name; empty until filled in during review or manual entry
    #[serde(default)]
    pub product_name: String,
    /// Capture instant; grouped into calendar days using the local zone
    pub timestamp: DateTime<Utc>,
    /// Reference to the captured photo, when one is kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
    /// Raw recognized text, kept for provenance and debugging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_ocr_text: Option<String>,
    /// Free-text serving size as printed on the label (e.g. "2/3 cup (55g)")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
    /// Free-text servings-per-container as printed on the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings_per_container: Option<String>,
    /// How many servings were actually consumed (defaults to 1)
    #[serde(default = "default_servings")]
    pub servings_consumed: f64,
    /// Per-serving nutrient values read off the label
    #[serde(default)]
    pub nutrients: Nutrients,
}

impl NutrientRecord {
    /// Create an empty record with a fresh id and the given capture time
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_name: String::new(),
            timestamp,
            photo_ref: None,
            raw_ocr_text: None,
            serving_size: None,
            servings_per_container: None,
            servings_consumed: 1.0,
            nutrients: Nutrients::default(),
        }
    }

    /// Effective consumption multiplier for aggregation.
    ///
    /// Zero, negative and non-finite values normalize to 1 so a record is
    /// always valid for aggregation.
    pub fn effective_servings(&self) -> f64 {
        if self.servings_consumed.is_finite() && self.servings_consumed > 0.0 {
            self.servings_consumed
        } else {
            1.0
        }
    }

    /// Calendar date of the capture in the machine-local zone.
    ///
    /// Captures at 23:00 and 01:00 local time on consecutive calendar days
    /// land on different dates even when their UTC instants are close.
    pub fn local_date(&self) -> NaiveDate {
        self.date_in_zone(&Local)
    }

    /// Calendar date of the capture in an explicit zone
    pub fn date_in_zone<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.timestamp.with_timezone(tz).date_naive()
    }

    /// Quality gate: extraction found enough to proceed to review.
    ///
    /// At least one of calories, protein or total fat must be present;
    /// otherwise the caller should offer manual entry or a retake.
    pub fn has_usable_data(&self) -> bool {
        self.nutrients.calories.is_some()
            || self.nutrients.protein.is_some()
            || self.nutrients.total_fat.is_some()
    }
}
