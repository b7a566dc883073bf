//! Wire types for `GET /api/conditions` and friends.
//!
//! Field names follow the JSON contract consumed by the browser wizard, which is why a few of
//! them are camelCase (`ageGroup`, `radiationString`) while the record-derived ones keep their
//! stored snake_case names (`scenario_id`, `scenario_description`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

/// A query parameter held a value outside its accepted set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported {param}: {value}")]
pub struct UnsupportedValue {
    pub param: &'static str,
    pub value: String,
}

// ============================================================================
// PARAMETER ENUMS
// ============================================================================

/// Patient age group selected in the first wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Adult,
    Child,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Adult => "adult",
            AgeGroup::Child => "child",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeGroup {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adult" => Ok(AgeGroup::Adult),
            "child" => Ok(AgeGroup::Child),
            _ => Err(UnsupportedValue {
                param: "ageGroup",
                value: s.to_string(),
            }),
        }
    }
}

/// Result set requested through the `type` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Panels,
    Conditions,
    Scenarios,
    Results,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Panels => "panels",
            QueryKind::Conditions => "conditions",
            QueryKind::Scenarios => "scenarios",
            QueryKind::Results => "results",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "panels" => Ok(QueryKind::Panels),
            "conditions" => Ok(QueryKind::Conditions),
            "scenarios" => Ok(QueryKind::Scenarios),
            "results" => Ok(QueryKind::Results),
            _ => Err(UnsupportedValue {
                param: "type",
                value: s.to_string(),
            }),
        }
    }
}

/// Clinical suitability bucket of a procedure for a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Appropriateness {
    Usually,
    Maybe,
    Rarely,
    Unknown,
}

// ============================================================================
// REQUEST
// ============================================================================

/// Raw query string of `GET /api/conditions`.
///
/// Every field stays a string here; validation into typed values happens in
/// `referral_core::ConditionsQuery` so that bad input yields the JSON error envelope rather
/// than an extractor rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConditionsParams {
    /// One of `panels`, `conditions`, `scenarios`, `results`; absent returns raw records.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// `adult` or `child`; absent disables age filtering.
    #[serde(rename = "ageGroup", default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    /// Case-insensitive exact match against stored body areas.
    #[serde(rename = "bodyArea", default, skip_serializing_if = "Option::is_none")]
    pub body_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Required when `type=results`.
    #[serde(rename = "scenarioId", default, skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
}

// ============================================================================
// PAYLOAD ITEMS
// ============================================================================

/// One entry of a `type=conditions` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConditionItem {
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

/// One entry of a `type=scenarios` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScenarioItem {
    pub scenario_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_description: Option<String>,
    /// Identifier of the first document carrying this scenario.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One classified procedure of a `type=results` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProcedureItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub appropriate: Appropriateness,
    /// Upper bound, in mSv, parsed from `radiationString`.
    pub score: u32,
    #[serde(rename = "radiationString")]
    pub radiation_string: String,
}

// ============================================================================
// ENVELOPE
// ============================================================================

/// Response envelope shared by every `/api/*` route.
///
/// Success carries `data`; failure carries `error`. The unused side is omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[aliases(
    PanelsResponse = ApiResponse<Vec<String>>,
    ConditionsResponse = ApiResponse<Vec<ConditionItem>>,
    ScenariosResponse = ApiResponse<Vec<ScenarioItem>>,
    ResultsResponse = ApiResponse<Vec<ProcedureItem>>
)]
pub struct ApiResponse<T> {
    pub success: bool,
    // No `default` here: it would put a `T: Default` bound on `Deserialize`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Converts the envelope into a `Result`, treating `success: false` or a missing `data`
    /// field as an error message.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("response carried no data".into()),
            (false, _) => Err(self.error.unwrap_or_else(|| "request failed".into())),
        }
    }
}
