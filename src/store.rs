//! # Persistence Boundary
//!
//! Key/value storage of nutrient records keyed by record id, with
//! date-keyed listing for aggregation. The recognition pipeline never
//! issues writes; persisting a reviewed record is the caller's
//! responsibility, and aggregation depends only on `list_by_date`.

use std::collections::HashMap;

use chrono::NaiveDate;
use parking_lot::RwLock;
use tracing::debug;

use crate::errors::AppResult;
use crate::record::NutrientRecord;

/// Key/value store of nutrient records
pub trait RecordStore: Send + Sync {
    /// Fetch a record by id
    fn get(&self, id: &str) -> AppResult<Option<NutrientRecord>>;

    /// Insert or replace a record under its id
    fn put(&self, record: NutrientRecord) -> AppResult<()>;

    /// Remove a record; removing a missing id is not an error
    fn delete(&self, id: &str) -> AppResult<()>;

    /// All records, newest capture first
    fn list_all(&self) -> AppResult<Vec<NutrientRecord>>;

    /// Records whose local calendar date equals `date`, oldest first
    fn list_by_date(&self, date: NaiveDate) -> AppResult<Vec<NutrientRecord>>;

    /// All records grouped by local calendar date, newest date first;
    /// records within a day are newest first
    fn grouped_by_date(&self) -> AppResult<Vec<(NaiveDate, Vec<NutrientRecord>)>> {
        let mut groups: Vec<(NaiveDate, Vec<NutrientRecord>)> = Vec::new();
        for record in self.list_all()? {
            let date = record.local_date();
            match groups.iter_mut().find(|(d, _)| *d == date) {
                Some((_, records)) => records.push(record),
                None => groups.push((date, vec![record])),
            }
        }
        groups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(groups)
    }
}

/// In-memory record store backing the CLI and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, NutrientRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, id: &str) -> AppResult<Option<NutrientRecord>> {
        Ok(self.records.read().get(id).cloned())
    }

    fn put(&self, record: NutrientRecord) -> AppResult<()> {
        debug!(id = %record.id, "Storing record");
        self.records.write().insert(record.id.clone(), record);
        Ok(())
    }

    fn delete(&self, id: &str) -> AppResult<()> {
        debug!(id = %id, "Deleting record");
        self.records.write().remove(id);
        Ok(())
    }

    fn list_all(&self) -> AppResult<Vec<NutrientRecord>> {
        let mut records: Vec<NutrientRecord> = self.records.read().values().cloned().collect();
        // Newest first; id as tie-breaker keeps the order deterministic
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    fn list_by_date(&self, date: NaiveDate) -> AppResult<Vec<NutrientRecord>> {
        let mut records: Vec<NutrientRecord> = self
            .records
            .read()
            .values()
            .filter(|record| record.local_date() == date)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(records)
    }
}
