use super::{admits_body_area, tidy_body_areas, RecordStore};
use crate::constants::{BODY_AREA_FIELDS, SCENARIO_ID_FIELDS};
use crate::error::StoreResult;
use crate::filters::body_area_pattern;
use crate::record::ClinicalRecord;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection};

/// MongoDB-backed record store.
///
/// Holds one pooled `Client` for the lifetime of the process. Every query matches both field
/// spellings with `$or`; body-area hits are then narrowed to the canonical spelling, as in
/// [`MemoryRecordStore`](super::MemoryRecordStore).
#[derive(Clone, Debug)]
pub struct MongoRecordStore {
    client: Client,
    collection: Collection<Document>,
}

impl MongoRecordStore {
    /// Create the client and bind to `database.collection`.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the first query rather
    /// than here.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let collection = client.database(database).collection::<Document>(collection);
        tracing::info!("bound to mongodb collection {}.{}", database, collection.name());
        Ok(Self { client, collection })
    }

    async fn find(&self, filter: Document) -> StoreResult<Vec<ClinicalRecord>> {
        let cursor = self.collection.find(filter).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents.iter().map(ClinicalRecord::from_document).collect())
    }
}

/// `$or` filter matching `value` under any of the `aliases`.
fn any_alias(aliases: &[&str], value: Bson) -> Document {
    let clauses: Vec<Document> = aliases
        .iter()
        .map(|field| {
            let mut clause = Document::new();
            clause.insert(*field, value.clone());
            clause
        })
        .collect();
    doc! { "$or": clauses }
}

fn body_area_filter(body_area: Option<&str>) -> Document {
    match body_area {
        Some(area) => any_alias(
            &BODY_AREA_FIELDS,
            Bson::Document(doc! { "$regex": body_area_pattern(area), "$options": "i" }),
        ),
        None => Document::new(),
    }
}

#[async_trait]
impl RecordStore for MongoRecordStore {
    async fn find_by_body_area(&self, body_area: Option<&str>) -> StoreResult<Vec<ClinicalRecord>> {
        let mut records = self.find(body_area_filter(body_area)).await?;
        records.retain(|r| admits_body_area(r, body_area));
        Ok(records)
    }

    async fn find_by_scenario_id(&self, scenario_id: &str) -> StoreResult<Vec<ClinicalRecord>> {
        self.find(any_alias(&SCENARIO_ID_FIELDS, Bson::String(scenario_id.to_string())))
            .await
    }

    async fn body_areas(&self) -> StoreResult<Vec<String>> {
        let mut values = Vec::new();
        for field in BODY_AREA_FIELDS {
            let distinct = self.collection.distinct(field, doc! {}).await?;
            values.extend(distinct.into_iter().filter_map(|v| match v {
                Bson::String(s) => Some(s),
                _ => None,
            }));
        }
        Ok(tidy_body_areas(values))
    }

    async fn shutdown(&self) {
        tracing::info!("closing mongodb client");
        self.client.clone().shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_area_filter_matches_both_spellings() {
        let filter = body_area_filter(Some("abdomen"));
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 2);

        let first = clauses[0].as_document().unwrap();
        let regex = first.get_document("body_area").unwrap();
        assert_eq!(regex.get_str("$regex").unwrap(), r"^\s*abdomen\s*$");
        assert_eq!(regex.get_str("$options").unwrap(), "i");
        assert!(clauses[1].as_document().unwrap().contains_key("Body Area"));
    }

    #[test]
    fn test_body_area_filter_without_area_is_empty() {
        assert!(body_area_filter(None).is_empty());
    }

    #[test]
    fn test_scenario_filter_is_exact() {
        let filter = any_alias(&SCENARIO_ID_FIELDS, Bson::String("S1".into()));
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(
            clauses[0].as_document().unwrap().get_str("scenario_id").unwrap(),
            "S1"
        );
    }
}
