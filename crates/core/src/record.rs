//! Canonical clinical records.
//!
//! Documents in the clinical collections were imported by several generations of seeding
//! scripts, so the same field may be spelled `panel` or `Panel`, `body_area` or `Body Area`.
//! Every document is mapped exactly once, at the store boundary, into a [`ClinicalRecord`] with
//! canonical field names. Nothing past this module looks at raw documents.
//!
//! Only string values count. A field holding a number, a boolean or `null` is treated as
//! absent, as is an empty string; the next alias is then tried.

use crate::constants::{
    ADULT_RRL_FIELDS, AGE_FIELDS, APPROPRIATENESS_FIELDS, BODY_AREA_FIELDS, CONDITION_FIELDS,
    ID_FIELD, PANEL_FIELDS, PEDS_RRL_FIELDS, PROCEDURES_FIELDS, PROCEDURE_NAME_FIELDS,
    SCENARIO_DESCRIPTION_FIELDS, SCENARIO_ID_FIELDS, SEVERITY_FIELDS,
};
use api_shared::AgeGroup;
use mongodb::bson::{Bson, Document};
use serde::Serialize;
use serde_json::{Map, Value};

/// One clinical-appropriateness document in canonical shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClinicalRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub panel: Option<String>,
    pub condition: Option<String>,
    pub body_area: Option<String>,
    pub age: Option<String>,
    pub scenario_id: Option<String>,
    pub scenario_description: Option<String>,
    pub severity: Option<String>,
    pub procedures: Vec<Procedure>,
}

/// One imaging procedure nested inside a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Procedure {
    pub procedure_name: Option<String>,
    pub appropriateness_category: Option<String>,
    pub adult_rrl: Option<String>,
    pub peds_rrl: Option<String>,
}

impl ClinicalRecord {
    /// Map a JSON document into canonical shape.
    ///
    /// Non-object values produce an empty record, which every filter later excludes.
    pub fn from_json(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };

        Self {
            id: document_id(fields),
            panel: text(fields, &PANEL_FIELDS),
            condition: text(fields, &CONDITION_FIELDS),
            body_area: text(fields, &BODY_AREA_FIELDS),
            age: text(fields, &AGE_FIELDS),
            scenario_id: text(fields, &SCENARIO_ID_FIELDS),
            scenario_description: text(fields, &SCENARIO_DESCRIPTION_FIELDS),
            severity: text(fields, &SEVERITY_FIELDS),
            procedures: PROCEDURES_FIELDS
                .iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_array))
                .map(|items| items.iter().filter_map(Procedure::from_json).collect())
                .unwrap_or_default(),
        }
    }

    /// Map a BSON document read from MongoDB into canonical shape.
    ///
    /// The document goes through relaxed extended JSON so BSON and fixture documents share a
    /// single mapping; an `ObjectId` arrives as `{"$oid": "<hex>"}` and is unwrapped to hex.
    pub fn from_document(document: &Document) -> Self {
        Self::from_json(&Bson::Document(document.clone()).into_relaxed_extjson())
    }

    /// Procedures of this record in stored order.
    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }
}

impl Procedure {
    fn from_json(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Self {
            procedure_name: text(fields, &PROCEDURE_NAME_FIELDS),
            appropriateness_category: text(fields, &APPROPRIATENESS_FIELDS),
            adult_rrl: text(fields, &ADULT_RRL_FIELDS),
            peds_rrl: text(fields, &PEDS_RRL_FIELDS),
        })
    }

    /// Radiation descriptor for the given age group: `adult_rrl` for adults, `peds_rrl`
    /// otherwise (including when no age group was chosen).
    pub fn radiation_for(&self, age_group: Option<AgeGroup>) -> Option<&str> {
        match age_group {
            Some(AgeGroup::Adult) => self.adult_rrl.as_deref(),
            _ => self.peds_rrl.as_deref(),
        }
    }
}

fn text(fields: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|key| {
        fields
            .get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

fn document_id(fields: &Map<String, Value>) -> Option<String> {
    match fields.get(ID_FIELD)? {
        Value::String(id) => Some(id.clone()),
        Value::Object(inner) => inner.get("$oid").and_then(Value::as_str).map(str::to_owned),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn test_from_json_reads_snake_case_fields() {
        let record = ClinicalRecord::from_json(&json!({
            "_id": "abc",
            "panel": "Gastrointestinal",
            "condition": "Acute pancreatitis",
            "body_area": "Abdomen",
            "age": "18 - 150",
            "scenario_id": "S1",
            "scenario_description": "Suspected acute pancreatitis",
            "severity": "emergent",
            "procedures": [{
                "procedure_name": "CT Abdomen",
                "appropriateness_category": "Usually Appropriate",
                "adult_rrl": "10-30 mSv",
                "peds_rrl": "3-10 mSv"
            }]
        }));

        assert_eq!(record.id.as_deref(), Some("abc"));
        assert_eq!(record.panel.as_deref(), Some("Gastrointestinal"));
        assert_eq!(record.body_area.as_deref(), Some("Abdomen"));
        assert_eq!(record.severity.as_deref(), Some("emergent"));
        assert_eq!(record.procedures.len(), 1);
        assert_eq!(
            record.procedures[0].procedure_name.as_deref(),
            Some("CT Abdomen")
        );
    }

    #[test]
    fn test_from_json_reads_legacy_field_names() {
        let record = ClinicalRecord::from_json(&json!({
            "Panel": "Cardiac",
            "Condition": "Chest pain",
            "Body Area": "Cardiac",
            "Age": "0 - 17",
            "Severity": "urgent",
            "Procedures": [{
                "Procedure Name": "Echo",
                "Appropriateness Category": "May Be Appropriate",
                "Peds RRL": "0 mSv"
            }]
        }));

        assert_eq!(record.panel.as_deref(), Some("Cardiac"));
        assert_eq!(record.condition.as_deref(), Some("Chest pain"));
        assert_eq!(record.body_area.as_deref(), Some("Cardiac"));
        assert_eq!(record.age.as_deref(), Some("0 - 17"));
        assert_eq!(record.procedures[0].peds_rrl.as_deref(), Some("0 mSv"));
    }

    #[test]
    fn test_empty_snake_case_value_falls_back_to_legacy_alias() {
        let record = ClinicalRecord::from_json(&json!({ "panel": "", "Panel": "Neurologic" }));
        assert_eq!(record.panel.as_deref(), Some("Neurologic"));
    }

    #[test]
    fn test_non_string_values_are_absent() {
        let record = ClinicalRecord::from_json(&json!({ "age": 42, "panel": null }));
        assert_eq!(record.age, None);
        assert_eq!(record.panel, None);
    }

    #[test]
    fn test_from_document_unwraps_object_id() {
        let oid = ObjectId::new();
        let record = ClinicalRecord::from_document(&doc! {
            "_id": oid,
            "Body Area": "Chest",
            "procedures": [ { "procedure_name": "Chest X-ray", "adult_rrl": "<0.1 mSv" } ],
        });

        assert_eq!(record.id, Some(oid.to_hex()));
        assert_eq!(record.body_area.as_deref(), Some("Chest"));
        assert_eq!(record.procedures[0].adult_rrl.as_deref(), Some("<0.1 mSv"));
    }

    #[test]
    fn test_radiation_for_age_group() {
        let procedure = Procedure {
            adult_rrl: Some("10-30 mSv".into()),
            peds_rrl: Some("3-10 mSv".into()),
            ..Procedure::default()
        };
        assert_eq!(procedure.radiation_for(Some(AgeGroup::Adult)), Some("10-30 mSv"));
        assert_eq!(procedure.radiation_for(Some(AgeGroup::Child)), Some("3-10 mSv"));
        assert_eq!(procedure.radiation_for(None), Some("3-10 mSv"));
    }
}
