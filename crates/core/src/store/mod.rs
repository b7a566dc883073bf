//! Data access for clinical records.
//!
//! [`RecordStore`] is the only seam between the query logic and the database. Implementations
//! normalise raw documents into [`ClinicalRecord`]s before returning them.
//!
//! Stores are created once at startup by [`open_store`] and torn down with
//! [`RecordStore::shutdown`] when the process exits.

mod memory;
mod mongo;

pub use memory::MemoryRecordStore;
pub use mongo::MongoRecordStore;

use crate::config::{CoreConfig, StoreSource};
use crate::error::StoreResult;
use crate::filters::text_matches;
use crate::record::ClinicalRecord;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Read-only access to the clinical collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Records whose body area matches `body_area` (anchored, case-insensitive), or every
    /// record when `body_area` is `None`.
    async fn find_by_body_area(&self, body_area: Option<&str>) -> StoreResult<Vec<ClinicalRecord>>;

    /// Records whose `scenario_id` equals `scenario_id` exactly.
    async fn find_by_scenario_id(&self, scenario_id: &str) -> StoreResult<Vec<ClinicalRecord>>;

    /// Distinct body areas across both field spellings, trimmed and sorted.
    async fn body_areas(&self) -> StoreResult<Vec<String>>;

    /// Release connections. Called once, after the server has stopped accepting requests.
    async fn shutdown(&self) {}
}

/// Open the store described by `cfg`.
///
/// # Errors
///
/// Returns a `StoreError` if the fixture cannot be loaded or the MongoDB client cannot be
/// created.
pub async fn open_store(cfg: &CoreConfig) -> StoreResult<Arc<dyn RecordStore>> {
    match cfg.store() {
        StoreSource::Mongo {
            uri,
            database,
            collection,
        } => {
            let store =
                MongoRecordStore::connect(uri.as_str(), database.as_str(), collection.as_str())
                    .await?;
            Ok(Arc::new(store))
        }
        StoreSource::Fixture(path) => Ok(Arc::new(MemoryRecordStore::from_path(path)?)),
    }
}

/// Whether a normalised record belongs to `body_area`; `None` admits every record.
///
/// Only the canonical body area counts. Both stores apply this last, so a document carrying
/// different values under the two spellings is matched the same way by each.
pub(crate) fn admits_body_area(record: &ClinicalRecord, body_area: Option<&str>) -> bool {
    body_area.map_or(true, |area| text_matches(record.body_area.as_deref(), area))
}

/// Trim, drop empties, deduplicate and sort a list of body-area values.
pub(crate) fn tidy_body_areas<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_body_area_uses_canonical_spelling() {
        let record = ClinicalRecord::from_json(&serde_json::json!({
            "body_area": "Abdomen-Pelvis",
            "Body Area": "Abdomen"
        }));
        assert!(!admits_body_area(&record, Some("abdomen")));
        assert!(admits_body_area(&record, Some("abdomen-pelvis")));
        assert!(admits_body_area(&record, None));
    }

    #[test]
    fn test_tidy_body_areas() {
        let tidy = tidy_body_areas(vec![
            "Chest".to_string(),
            " Abdomen ".to_string(),
            "".to_string(),
            "Abdomen".to_string(),
        ]);
        assert_eq!(tidy, vec!["Abdomen".to_string(), "Chest".to_string()]);
    }
}
