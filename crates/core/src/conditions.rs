//! Conditions query service.
//!
//! Resolves a [`ConditionsQuery`] against a [`RecordStore`]:
//!
//! - `panels`, `conditions`, `scenarios` and untyped queries start from the records matching
//!   the body area, then drop records whose age range does not admit the age group;
//! - `results` skips that chain and reads every record of one scenario, flattening and scoring
//!   their procedures.
//!
//! The collection helpers are plain functions over normalised records so they can be tested
//! without a store.

use crate::constants::PLACEHOLDER_CONDITION;
use crate::error::{QueryError, QueryResult, StoreResult};
use crate::filters::{age_admits, text_matches};
use crate::query::ConditionsQuery;
use crate::record::ClinicalRecord;
use crate::scoring::{classify_appropriateness, radiation_score};
use crate::store::RecordStore;
use api_shared::{AgeGroup, ConditionItem, ProcedureItem, QueryKind, ScenarioItem};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Result set of a conditions query; serialises as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Panels(Vec<String>),
    Conditions(Vec<ConditionItem>),
    Scenarios(Vec<ScenarioItem>),
    Results(Vec<ProcedureItem>),
    Records(Vec<ClinicalRecord>),
}

impl QueryOutput {
    pub fn len(&self) -> usize {
        match self {
            QueryOutput::Panels(v) => v.len(),
            QueryOutput::Conditions(v) => v.len(),
            QueryOutput::Scenarios(v) => v.len(),
            QueryOutput::Results(v) => v.len(),
            QueryOutput::Records(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stateless query service over a shared record store.
#[derive(Clone)]
pub struct ConditionsService {
    store: Arc<dyn RecordStore>,
}

impl ConditionsService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Run a query and return its result set.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingScenarioId`] for a results query without a scenario id and
    /// [`QueryError::Store`] when the store fails.
    pub async fn run(&self, query: &ConditionsQuery) -> QueryResult<QueryOutput> {
        let output = match query.kind {
            Some(QueryKind::Results) => {
                let scenario_id = query
                    .scenario_id
                    .as_ref()
                    .ok_or(QueryError::MissingScenarioId)?;
                QueryOutput::Results(self.results(scenario_id.as_str(), query.age_group).await?)
            }
            kind => {
                let records = self
                    .filtered_records(
                        query.body_area.as_ref().map(|b| b.as_str()),
                        query.age_group,
                    )
                    .await?;
                let panel = query.panel.as_ref().map(|p| p.as_str());

                match kind {
                    Some(QueryKind::Panels) => QueryOutput::Panels(collect_panels(&records)),
                    Some(QueryKind::Conditions) => {
                        QueryOutput::Conditions(collect_conditions(&records, panel))
                    }
                    Some(QueryKind::Scenarios) => QueryOutput::Scenarios(collect_scenarios(
                        &records,
                        panel,
                        query.condition.as_ref().map(|c| c.as_str()),
                    )),
                    _ => QueryOutput::Records(records),
                }
            }
        };

        tracing::debug!(
            kind = query.kind.map(|k| k.as_str()).unwrap_or("records"),
            count = output.len(),
            "conditions query resolved"
        );
        Ok(output)
    }

    /// Records for a body area that admit the age group.
    pub async fn filtered_records(
        &self,
        body_area: Option<&str>,
        age_group: Option<AgeGroup>,
    ) -> StoreResult<Vec<ClinicalRecord>> {
        let records = self.store.find_by_body_area(body_area).await?;
        let found = records.len();

        let filtered: Vec<ClinicalRecord> = records
            .into_iter()
            .filter(|r| age_admits(r.age.as_deref(), age_group))
            .collect();

        tracing::debug!(
            body_area = body_area.unwrap_or("*"),
            age_group = age_group.map(|a| a.as_str()).unwrap_or("*"),
            found,
            kept = filtered.len(),
            "filtered records by age"
        );
        Ok(filtered)
    }

    /// Scored procedures of every record carrying `scenario_id`.
    pub async fn results(
        &self,
        scenario_id: &str,
        age_group: Option<AgeGroup>,
    ) -> StoreResult<Vec<ProcedureItem>> {
        let records = self.store.find_by_scenario_id(scenario_id).await?;
        tracing::debug!("found {} records for scenario {}", records.len(), scenario_id);
        Ok(score_procedures(&records, age_group))
    }

    /// Distinct body areas known to the store.
    pub async fn body_areas(&self) -> StoreResult<Vec<String>> {
        self.store.body_areas().await
    }
}

/// Sorted distinct panels.
pub fn collect_panels(records: &[ClinicalRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.panel.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Conditions of a panel, deduplicated by name in record order.
///
/// The first record of each name supplies the severity. Placeholder rows are dropped.
pub fn collect_conditions(records: &[ClinicalRecord], panel: Option<&str>) -> Vec<ConditionItem> {
    let mut seen = HashSet::new();

    records
        .iter()
        .filter(|r| panel.map_or(true, |p| text_matches(r.panel.as_deref(), p)))
        .filter_map(|r| {
            let name = r.condition.as_deref()?;
            if name.eq_ignore_ascii_case(PLACEHOLDER_CONDITION) || !seen.insert(name) {
                return None;
            }
            Some(ConditionItem {
                condition: name.to_string(),
                severity: r.severity.clone(),
            })
        })
        .collect()
}

/// Scenarios of a panel and condition, deduplicated by `scenario_id` in record order.
///
/// Records without a scenario id cannot be selected and are skipped.
pub fn collect_scenarios(
    records: &[ClinicalRecord],
    panel: Option<&str>,
    condition: Option<&str>,
) -> Vec<ScenarioItem> {
    let mut seen = HashSet::new();

    records
        .iter()
        .filter(|r| panel.map_or(true, |p| text_matches(r.panel.as_deref(), p)))
        .filter(|r| condition.map_or(true, |c| r.condition.as_deref() == Some(c)))
        .filter_map(|r| {
            let scenario_id = r.scenario_id.as_deref()?;
            if !seen.insert(scenario_id) {
                return None;
            }
            Some(ScenarioItem {
                scenario_id: scenario_id.to_string(),
                scenario_description: r.scenario_description.clone(),
                id: r.id.clone(),
            })
        })
        .collect()
}

/// Flatten and score the procedures of `records` in stored order.
pub fn score_procedures(
    records: &[ClinicalRecord],
    age_group: Option<AgeGroup>,
) -> Vec<ProcedureItem> {
    records
        .iter()
        .flat_map(|r| r.procedures())
        .map(|procedure| {
            let radiation = procedure.radiation_for(age_group);
            ProcedureItem {
                name: procedure.procedure_name.clone(),
                appropriate: classify_appropriateness(
                    procedure.appropriateness_category.as_deref(),
                ),
                score: radiation_score(radiation),
                radiation_string: radiation.unwrap_or_default().to_string(),
            }
        })
        .collect()
}
