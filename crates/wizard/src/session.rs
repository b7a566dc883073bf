//! Drives a [`Wizard`] against a [`ConditionsApi`].

use api_shared::AgeGroup;

use crate::client::ConditionsApi;
use crate::error::WizardResult;
use crate::state::{Completion, Step, Ticket, Wizard};

/// A wizard bundled with the API it fetches from.
///
/// Each action issues its fetch and applies the response before returning, so at most one
/// request is in flight.
pub struct WizardSession<C> {
    wizard: Wizard,
    api: C,
}

impl<C: ConditionsApi> WizardSession<C> {
    pub fn new(api: C) -> Self {
        Self {
            wizard: Wizard::new(),
            api,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    async fn run(&mut self, ticket: Ticket) -> Completion {
        let outcome = self.api.fetch(&ticket.request).await;
        self.wizard.complete(ticket.token, outcome)
    }

    pub fn start(&mut self) -> WizardResult<()> {
        self.wizard.start()
    }

    pub fn select_patient(&mut self, age_group: AgeGroup) -> WizardResult<()> {
        self.wizard.select_patient(age_group)
    }

    pub async fn select_body_area(&mut self, body_area: &str) -> WizardResult<Completion> {
        let ticket = self.wizard.select_body_area(body_area)?;
        Ok(self.run(ticket).await)
    }

    pub async fn select_panel(&mut self, panel: &str) -> WizardResult<Completion> {
        let ticket = self.wizard.select_panel(panel)?;
        Ok(self.run(ticket).await)
    }

    pub fn select_condition(&mut self, condition: &str) -> WizardResult<()> {
        self.wizard.select_condition(condition)
    }

    pub async fn next(&mut self) -> WizardResult<Completion> {
        let ticket = self.wizard.next()?;
        Ok(self.run(ticket).await)
    }

    pub async fn select_scenario(&mut self, scenario_id: &str) -> WizardResult<Completion> {
        let ticket = self.wizard.select_scenario(scenario_id)?;
        Ok(self.run(ticket).await)
    }

    pub async fn retry(&mut self) -> WizardResult<Completion> {
        let ticket = self.wizard.retry()?;
        Ok(self.run(ticket).await)
    }

    pub fn toggle_not_appropriate(&mut self) -> WizardResult<bool> {
        self.wizard.toggle_not_appropriate()
    }

    pub fn back(&mut self) -> WizardResult<Step> {
        self.wizard.back()
    }

    pub fn go_to(&mut self, step: Step) -> WizardResult<()> {
        self.wizard.go_to(step)
    }

    pub fn start_again(&mut self) {
        self.wizard.start_again()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::state::{FetchRequest, FetchResponse, WizardState};
    use api_shared::{Appropriateness, ConditionItem, ProcedureItem, ScenarioItem};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers from canned data; the first `failures` calls are rejected.
    struct CannedApi {
        failures: AtomicUsize,
    }

    impl CannedApi {
        fn new(failures: usize) -> Self {
            Self {
                failures: AtomicUsize::new(failures),
            }
        }
    }

    #[async_trait]
    impl ConditionsApi for CannedApi {
        async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, ClientError> {
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(ClientError::Rejected("database unavailable".into()));
            }

            Ok(match request {
                FetchRequest::Panels { .. } => FetchResponse::Panels(vec!["Cardiology".into()]),
                FetchRequest::Conditions { .. } => FetchResponse::Conditions(vec![
                    ConditionItem {
                        condition: "placeholder".into(),
                        severity: None,
                    },
                    ConditionItem {
                        condition: "Chest pain".into(),
                        severity: Some("urgent".into()),
                    },
                ]),
                FetchRequest::Scenarios { .. } => FetchResponse::Scenarios(vec![ScenarioItem {
                    scenario_id: "S1".into(),
                    scenario_description: Some("Acute chest pain".into()),
                    id: Some("a1".into()),
                }]),
                FetchRequest::Results { .. } => FetchResponse::Results(vec![
                    ProcedureItem {
                        name: Some("CT coronary angiography".into()),
                        appropriate: Appropriateness::Usually,
                        score: 10,
                        radiation_string: "1-10 mSv".into(),
                    },
                    ProcedureItem {
                        name: Some("Chest radiograph".into()),
                        appropriate: Appropriateness::Unknown,
                        score: 0,
                        radiation_string: String::new(),
                    },
                ]),
            })
        }
    }

    #[tokio::test]
    async fn test_full_walkthrough() {
        let mut session = WizardSession::new(CannedApi::new(0));
        session.start().unwrap();
        session.select_patient(AgeGroup::Adult).unwrap();
        assert_eq!(
            session.select_body_area("cardiac").await.unwrap(),
            Completion::Applied
        );
        session.select_panel("Cardiology").await.unwrap();

        let WizardState::PanelCondition(picker) = session.wizard().state() else {
            panic!("expected picker");
        };
        assert_eq!(picker.conditions.len(), 1);
        assert_eq!(picker.conditions[0].severity, "urgent");

        session.select_condition("Chest pain").unwrap();
        session.next().await.unwrap();
        session.select_scenario("S1").await.unwrap();

        let WizardState::Results(results) = session.wizard().state() else {
            panic!("expected results");
        };
        assert_eq!(results.scenario.scenario_id, "S1");
        assert_eq!(results.visible().len(), 1);
        assert!(session.toggle_not_appropriate().unwrap());

        session.start_again();
        assert_eq!(session.wizard().step(), Step::Start);
    }

    #[tokio::test]
    async fn test_failed_fetch_then_retry() {
        let mut session = WizardSession::new(CannedApi::new(1));
        session.start().unwrap();
        session.select_patient(AgeGroup::Child).unwrap();

        assert_eq!(
            session.select_body_area("head").await.unwrap(),
            Completion::Failed
        );
        assert_eq!(session.wizard().step(), Step::BodyArea);
        assert!(session.wizard().failure().is_some());

        assert_eq!(session.retry().await.unwrap(), Completion::Applied);
        assert_eq!(session.wizard().step(), Step::PanelCondition);
    }
}
