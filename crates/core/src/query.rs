//! Validated form of a `GET /api/conditions` request.

use crate::error::{QueryError, QueryResult};
use api_shared::{AgeGroup, ConditionsParams, QueryKind};
use referral_types::NonEmptyText;

/// Typed conditions query.
///
/// Blank parameters are treated exactly like missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionsQuery {
    /// `None` requests every record passing the body-area and age filters.
    pub kind: Option<QueryKind>,
    pub age_group: Option<AgeGroup>,
    pub body_area: Option<NonEmptyText>,
    pub panel: Option<NonEmptyText>,
    pub condition: Option<NonEmptyText>,
    pub scenario_id: Option<NonEmptyText>,
}

impl ConditionsQuery {
    pub fn new(kind: QueryKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn age_group(mut self, age_group: AgeGroup) -> Self {
        self.age_group = Some(age_group);
        self
    }

    pub fn body_area(mut self, body_area: &str) -> Self {
        self.body_area = NonEmptyText::new(body_area).ok();
        self
    }

    pub fn panel(mut self, panel: &str) -> Self {
        self.panel = NonEmptyText::new(panel).ok();
        self
    }

    pub fn condition(mut self, condition: &str) -> Self {
        self.condition = NonEmptyText::new(condition).ok();
        self
    }

    pub fn scenario_id(mut self, scenario_id: &str) -> Self {
        self.scenario_id = NonEmptyText::new(scenario_id).ok();
        self
    }
}

impl TryFrom<ConditionsParams> for ConditionsQuery {
    type Error = QueryError;

    /// # Errors
    ///
    /// Returns [`QueryError::UnsupportedValue`] for an unknown `type` or `ageGroup`, and
    /// [`QueryError::MissingScenarioId`] when `type=results` has no `scenarioId`.
    fn try_from(params: ConditionsParams) -> QueryResult<Self> {
        let kind = NonEmptyText::from_optional(params.kind)
            .map(|k| k.as_str().parse::<QueryKind>())
            .transpose()?;
        let age_group = NonEmptyText::from_optional(params.age_group)
            .map(|a| a.as_str().parse::<AgeGroup>())
            .transpose()?;

        let query = Self {
            kind,
            age_group,
            body_area: NonEmptyText::from_optional(params.body_area),
            panel: NonEmptyText::from_optional(params.panel),
            condition: NonEmptyText::from_optional(params.condition),
            scenario_id: NonEmptyText::from_optional(params.scenario_id),
        };

        if query.kind == Some(QueryKind::Results) && query.scenario_id.is_none() {
            return Err(QueryError::MissingScenarioId);
        }

        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConditionsParams {
        ConditionsParams::default()
    }

    #[test]
    fn test_results_without_scenario_id_is_rejected() {
        let err = ConditionsQuery::try_from(ConditionsParams {
            kind: Some("results".into()),
            scenario_id: Some("   ".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "scenarioId is required for results");
        assert!(err.is_validation());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = ConditionsQuery::try_from(ConditionsParams {
            kind: Some("everything".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "unsupported type: everything");
    }

    #[test]
    fn test_unknown_age_group_is_rejected() {
        let err = ConditionsQuery::try_from(ConditionsParams {
            age_group: Some("senior".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "unsupported ageGroup: senior");
    }

    #[test]
    fn test_blank_parameters_are_absent() {
        let query = ConditionsQuery::try_from(ConditionsParams {
            kind: Some("".into()),
            age_group: Some("".into()),
            body_area: Some(" ".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query, ConditionsQuery::default());
    }

    #[test]
    fn test_full_params_are_typed() {
        let query = ConditionsQuery::try_from(ConditionsParams {
            kind: Some("scenarios".into()),
            age_group: Some("child".into()),
            body_area: Some("abdomen".into()),
            panel: Some("Gastrointestinal".into()),
            condition: Some("Appendicitis".into()),
            scenario_id: None,
        })
        .unwrap();

        assert_eq!(
            query,
            ConditionsQuery::new(QueryKind::Scenarios)
                .age_group(AgeGroup::Child)
                .body_area("abdomen")
                .panel("Gastrointestinal")
                .condition("Appendicitis")
        );
    }
}
