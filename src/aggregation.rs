//! # Daily Aggregation
//!
//! This module combines a day's records into per-nutrient totals, applying
//! each record's serving multiplier. Summaries are derived on demand and
//! never persisted; the function is pure over its inputs. Grouping of
//! records into calendar days happens at the persistence boundary using
//! each record's local timestamp.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppResult;
use crate::record::NutrientRecord;
use crate::store::RecordStore;

/// Accumulated nutrient totals for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Calendar day in the local zone, no time component
    pub date: NaiveDate,
    pub total_calories: f64,
    pub total_fat: f64,
    pub total_sodium: f64,
    pub total_carb: f64,
    pub total_sugars: f64,
    pub total_added_sugars: f64,
    pub total_protein: f64,
    /// Records contributing to this day, in the order supplied
    pub records: Vec<NutrientRecord>,
}

/// Sum a day's records into per-nutrient totals.
///
/// Each record contributes `value * effective_servings()` per tracked
/// nutrient. An absent field contributes 0, distinct from "unknown", so
/// partial records still produce a defined total.
pub fn summarize(date: NaiveDate, records: Vec<NutrientRecord>) -> DaySummary {
    let mut summary = DaySummary {
        date,
        total_calories: 0.0,
        total_fat: 0.0,
        total_sodium: 0.0,
        total_carb: 0.0,
        total_sugars: 0.0,
        total_added_sugars: 0.0,
        total_protein: 0.0,
        records: Vec::new(),
    };

    for record in &records {
        let servings = record.effective_servings();
        let nutrients = &record.nutrients;

        summary.total_calories += nutrients.calories.unwrap_or(0.0) * servings;
        summary.total_fat += nutrients.total_fat.unwrap_or(0.0) * servings;
        summary.total_sodium += nutrients.sodium.unwrap_or(0.0) * servings;
        summary.total_carb += nutrients.total_carb.unwrap_or(0.0) * servings;
        summary.total_sugars += nutrients.total_sugars.unwrap_or(0.0) * servings;
        summary.total_added_sugars += nutrients.added_sugars.unwrap_or(0.0) * servings;
        summary.total_protein += nutrients.protein.unwrap_or(0.0) * servings;
    }

    debug!(
        date = %date,
        records = records.len(),
        calories = summary.total_calories,
        "Day summary computed"
    );

    summary.records = records;
    summary
}

/// Summary for `date` from the persisted records of that local calendar day
pub fn summarize_day(store: &dyn RecordStore, date: NaiveDate) -> AppResult<DaySummary> {
    Ok(summarize(date, store.list_by_date(date)?))
}
