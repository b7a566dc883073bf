use super::{admits_body_area, tidy_body_areas, RecordStore};
use crate::error::{StoreError, StoreResult};
use crate::record::ClinicalRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

/// In-memory record store.
///
/// Backs the test suites and offline use of the CLI and server (`REFERRAL_FIXTURE`). It applies
/// the same matching rules as the MongoDB queries.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    records: Vec<ClinicalRecord>,
}

impl MemoryRecordStore {
    pub fn new(records: Vec<ClinicalRecord>) -> Self {
        Self { records }
    }

    /// Build a store from raw JSON documents, normalising each one.
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a Value>) -> Self {
        Self::new(documents.into_iter().map(ClinicalRecord::from_json).collect())
    }

    /// Parse a JSON array of documents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FixtureParse`] for invalid JSON and [`StoreError::FixtureShape`]
    /// when the top-level value is not an array.
    pub fn from_json_str(raw: &str) -> StoreResult<Self> {
        let value: Value = serde_json::from_str(raw).map_err(StoreError::FixtureParse)?;
        let documents = value.as_array().ok_or(StoreError::FixtureShape)?;
        Ok(Self::from_documents(documents))
    }

    /// Load a JSON fixture file.
    pub fn from_path(path: &Path) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(StoreError::FixtureRead)?;
        let store = Self::from_json_str(&raw)?;
        tracing::info!(
            "loaded {} fixture records from {}",
            store.records.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_by_body_area(&self, body_area: Option<&str>) -> StoreResult<Vec<ClinicalRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| admits_body_area(r, body_area))
            .cloned()
            .collect())
    }

    async fn find_by_scenario_id(&self, scenario_id: &str) -> StoreResult<Vec<ClinicalRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.scenario_id.as_deref() == Some(scenario_id))
            .cloned()
            .collect())
    }

    async fn body_areas(&self) -> StoreResult<Vec<String>> {
        Ok(tidy_body_areas(
            self.records.iter().filter_map(|r| r.body_area.clone()),
        ))
    }
}
