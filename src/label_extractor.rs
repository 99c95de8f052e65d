//! # Nutrient Field Extraction
//!
//! This module deterministically parses raw recognized text into typed
//! nutrient fields. Extraction is a fixed, ordered table of per-field rules,
//! each a pattern with a numeric capture group and the unit the label prints
//! beside the value. For fields with multiple plausible phrasings the rules
//! are tried in priority order and the first successful match wins; there is
//! no merging across rules.
//!
//! Parsing never fails: absence of a field is represented as "not present",
//! not as an error, so an unreadable field never blocks the others.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::record::{NumericField, Nutrients};

/// Unit printed beside the value a rule captures.
///
/// Carried for diagnostics only; values keep the label's literal unit and
/// are never converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitAssumption {
    Grams,
    Milligrams,
    Unitless,
}

/// One extraction rule: a pattern with a single numeric capture group,
/// tagged with the field it populates and the unit it assumes
struct FieldRule {
    field: NumericField,
    pattern: Regex,
    unit: UnitAssumption,
}

fn rule(field: NumericField, pattern: &str, unit: UnitAssumption) -> FieldRule {
    FieldRule {
        field,
        pattern: Regex::new(pattern).expect("nutrient extraction pattern should be valid"),
        unit,
    }
}

/// The ordered rule table. Order is priority: where a field has several
/// phrasings, the more specific pattern comes first and later rules for an
/// already-populated field are skipped.
fn build_extraction_rules() -> Vec<FieldRule> {
    use NumericField::*;
    use UnitAssumption::*;

    vec![
        rule(Calories, r"(?i)calories[:\s]+(\d+)", Unitless),
        rule(
            Calories,
            r"(?i)amount per serving[\s\S]*?(\d+)\s*calories",
            Unitless,
        ),
        rule(TotalFat, r"(?i)total fat[:\s]+(\d+\.?\d*)g", Grams),
        rule(SaturatedFat, r"(?i)saturated fat[:\s]+(\d+\.?\d*)g", Grams),
        rule(TransFat, r"(?i)trans fat[:\s]+(\d+\.?\d*)g", Grams),
        rule(
            Cholesterol,
            r"(?i)cholesterol[:\s]+(\d+\.?\d*)mg",
            Milligrams,
        ),
        rule(Sodium, r"(?i)sodium[:\s]+(\d+\.?\d*)mg", Milligrams),
        rule(
            TotalCarb,
            r"(?i)total carbohydrate[:\s]+(\d+\.?\d*)g",
            Grams,
        ),
        rule(TotalCarb, r"(?i)total carb\.?[:\s]+(\d+\.?\d*)g", Grams),
        rule(DietaryFiber, r"(?i)dietary fiber[:\s]+(\d+\.?\d*)g", Grams),
        rule(TotalSugars, r"(?i)total sugars[:\s]+(\d+\.?\d*)g", Grams),
        rule(TotalSugars, r"(?i)sugars[:\s]+(\d+\.?\d*)g", Grams),
        rule(
            AddedSugars,
            r"(?i)(?:incl\.?|includes?)\s+(\d+\.?\d*)g?\s+added sugars",
            Grams,
        ),
        rule(AddedSugars, r"(?i)added sugars[:\s]+(\d+\.?\d*)g", Grams),
        rule(Protein, r"(?i)protein[:\s]+(\d+\.?\d*)g", Grams),
        rule(VitaminD, r"(?i)vitamin d[:\s]+(\d+\.?\d*)", Unitless),
        rule(Calcium, r"(?i)calcium[:\s]+(\d+\.?\d*)", Unitless),
        rule(Iron, r"(?i)iron[:\s]+(\d+\.?\d*)", Unitless),
        rule(Potassium, r"(?i)potassium[:\s]+(\d+\.?\d*)", Unitless),
    ]
}

// Lazy static rule table and serving-descriptor patterns to avoid recompilation
lazy_static! {
    static ref EXTRACTION_RULES: Vec<FieldRule> = build_extraction_rules();
    static ref SERVING_SIZE: Regex = Regex::new(r"(?i)serving size[:\s]+([^\n]+)")
        .expect("serving size pattern should be valid");
    static ref SERVINGS_PER_CONTAINER: Regex =
        Regex::new(r"(?i)servings per container[:\s]+([^\n]+)")
            .expect("servings per container pattern should be valid");
}

/// Partial structured record produced by [`NutrientFieldExtractor::parse`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedLabel {
    /// The raw recognized text the fields were extracted from
    pub raw_text: String,
    /// Free-text serving size as printed on the label
    pub serving_size: Option<String>,
    /// Free-text servings-per-container as printed on the label
    pub servings_per_container: Option<String>,
    /// Extracted per-serving nutrient values
    pub nutrients: Nutrients,
}

impl ParsedLabel {
    /// Quality gate: whether extraction found enough to proceed to review
    /// instead of prompting a retake. At least one of calories, protein or
    /// total fat must be present.
    pub fn has_usable_data(&self) -> bool {
        self.nutrients.calories.is_some()
            || self.nutrients.protein.is_some()
            || self.nutrients.total_fat.is_some()
    }
}

/// Deterministic nutrient field extractor over raw recognized text
#[derive(Debug, Clone, Default)]
pub struct NutrientFieldExtractor;

impl NutrientFieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse recognized text into a partial record.
    ///
    /// Pure: identical text always yields an identical result, and parsing
    /// never fails. Matching is case-insensitive and only the first match
    /// per field is used, even when the label text repeats a phrase in a
    /// nutrient-breakdown sub-table.
    pub fn parse(&self, text: &str) -> ParsedLabel {
        let mut parsed = ParsedLabel {
            raw_text: text.to_string(),
            ..Default::default()
        };

        parsed.serving_size = capture_text(&SERVING_SIZE, text);
        parsed.servings_per_container = capture_text(&SERVINGS_PER_CONTAINER, text);

        for rule in EXTRACTION_RULES.iter() {
            if parsed.nutrients.get(rule.field).is_some() {
                // an earlier, higher-priority rule already matched
                continue;
            }
            if let Some(value) = capture_number(&rule.pattern, text) {
                trace!(field = ?rule.field, value, unit = ?rule.unit, "Matched nutrient field");
                parsed.nutrients.set(rule.field, value);
            }
        }

        debug!(
            fields = parsed.nutrients.present_count(),
            usable = parsed.has_usable_data(),
            "Label text parsed"
        );
        parsed
    }
}

/// First capture group of the first match, trimmed
fn capture_text(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// First capture group of the first match, parsed as a number.
///
/// Thousands separators are stripped before parsing; a capture that still
/// fails to parse (or is non-finite) omits the field rather than producing
/// a sentinel value.
fn capture_number(pattern: &Regex, text: &str) -> Option<f64> {
    let raw = pattern.captures(text)?.get(1)?.as_str().replace(',', "");
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}
