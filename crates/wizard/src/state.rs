//! Wizard state machine.
//!
//! The machine never performs I/O. Actions that need server data return a [`Ticket`]; the
//! caller fetches it and hands the outcome back through [`Wizard::complete`]. Only the
//! response for the most recently issued ticket is applied, and a failure leaves the state
//! where it was with a retryable [`FetchFailure`] recorded.

use std::fmt;

use api_shared::{AgeGroup, ConditionItem, ConditionsParams, ProcedureItem, ScenarioItem};

use crate::error::{ClientError, WizardError, WizardResult};
use crate::results::ResultBuckets;

const PLACEHOLDER_CONDITION: &str = "placeholder";
const DEFAULT_SEVERITY: &str = "normal";

/// Position in the wizard, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Start,
    PatientType,
    BodyArea,
    PanelCondition,
    ScenarioList,
    Results,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Start => "start",
            Step::PatientType => "patient type",
            Step::BodyArea => "body area",
            Step::PanelCondition => "panel and condition",
            Step::ScenarioList => "scenario list",
            Step::Results => "results",
        };
        f.write_str(name)
    }
}

/// A condition as offered in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionOption {
    pub label: String,
    pub severity: String,
}

impl ConditionOption {
    /// Drops placeholder rows and fills in a missing severity.
    pub fn from_items(items: Vec<ConditionItem>) -> Vec<Self> {
        items
            .into_iter()
            .filter(|item| {
                !item
                    .condition
                    .trim()
                    .eq_ignore_ascii_case(PLACEHOLDER_CONDITION)
            })
            .map(|item| ConditionOption {
                label: item.condition,
                severity: item
                    .severity
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SEVERITY.to_string()),
            })
            .collect()
    }
}

/// Panel and condition picker for one body area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub age_group: AgeGroup,
    pub body_area: String,
    pub panels: Vec<String>,
    pub panel: Option<String>,
    /// Conditions of the selected panel; empty until they have been fetched.
    pub conditions: Vec<ConditionOption>,
    pub condition: Option<String>,
}

/// Scenarios matching the chosen panel and condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioStage {
    pub picker: Picker,
    pub panel: String,
    pub condition: String,
    pub scenarios: Vec<ScenarioItem>,
}

/// Classified procedures of the chosen scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsStage {
    pub stage: ScenarioStage,
    pub scenario: ScenarioItem,
    pub buckets: ResultBuckets,
    pub show_not_appropriate: bool,
}

impl ResultsStage {
    pub fn visible(&self) -> Vec<&ProcedureItem> {
        self.buckets.visible(self.show_not_appropriate)
    }
}

/// Everything the presentation layer needs to render the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    Start,
    PatientType,
    BodyArea { age_group: AgeGroup },
    PanelCondition(Picker),
    ScenarioList(ScenarioStage),
    Results(ResultsStage),
}

impl WizardState {
    pub fn step(&self) -> Step {
        match self {
            WizardState::Start => Step::Start,
            WizardState::PatientType => Step::PatientType,
            WizardState::BodyArea { .. } => Step::BodyArea,
            WizardState::PanelCondition(_) => Step::PanelCondition,
            WizardState::ScenarioList(_) => Step::ScenarioList,
            WizardState::Results(_) => Step::Results,
        }
    }

    /// The state one step earlier, or `None` at `Start`.
    fn previous(self) -> Option<WizardState> {
        match self {
            WizardState::Start => None,
            WizardState::PatientType => Some(WizardState::Start),
            WizardState::BodyArea { .. } => Some(WizardState::PatientType),
            WizardState::PanelCondition(picker) => Some(WizardState::BodyArea {
                age_group: picker.age_group,
            }),
            WizardState::ScenarioList(stage) => Some(WizardState::PanelCondition(stage.picker)),
            WizardState::Results(results) => Some(WizardState::ScenarioList(results.stage)),
        }
    }
}

/// Data the wizard needs from the conditions API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Panels {
        age_group: AgeGroup,
        body_area: String,
    },
    Conditions {
        age_group: AgeGroup,
        body_area: String,
        panel: String,
    },
    Scenarios {
        age_group: AgeGroup,
        body_area: String,
        panel: String,
        condition: String,
    },
    Results {
        age_group: AgeGroup,
        body_area: String,
        scenario: ScenarioItem,
    },
}

impl FetchRequest {
    /// Query string for `GET /api/conditions`.
    pub fn params(&self) -> ConditionsParams {
        match self {
            FetchRequest::Panels {
                age_group,
                body_area,
            } => ConditionsParams {
                kind: Some("panels".into()),
                age_group: Some(age_group.to_string()),
                body_area: Some(body_area.clone()),
                ..Default::default()
            },
            FetchRequest::Conditions {
                age_group,
                body_area,
                panel,
            } => ConditionsParams {
                kind: Some("conditions".into()),
                age_group: Some(age_group.to_string()),
                body_area: Some(body_area.clone()),
                panel: Some(panel.clone()),
                ..Default::default()
            },
            FetchRequest::Scenarios {
                age_group,
                body_area,
                panel,
                condition,
            } => ConditionsParams {
                kind: Some("scenarios".into()),
                age_group: Some(age_group.to_string()),
                body_area: Some(body_area.clone()),
                panel: Some(panel.clone()),
                condition: Some(condition.clone()),
                ..Default::default()
            },
            FetchRequest::Results {
                age_group,
                body_area,
                scenario,
            } => ConditionsParams {
                kind: Some("results".into()),
                age_group: Some(age_group.to_string()),
                body_area: Some(body_area.clone()),
                scenario_id: Some(scenario.scenario_id.clone()),
                ..Default::default()
            },
        }
    }
}

/// Payload answering a [`FetchRequest`] of the same variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResponse {
    Panels(Vec<String>),
    Conditions(Vec<ConditionItem>),
    Scenarios(Vec<ScenarioItem>),
    Results(Vec<ProcedureItem>),
}

/// A fetch the caller must perform, stamped with the token `complete` expects back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub token: u64,
    pub request: FetchRequest,
}

/// The last fetch that failed, kept for `retry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub request: FetchRequest,
    pub message: String,
}

/// What `complete` did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response advanced or refreshed the state.
    Applied,
    /// The response was stale or no longer fits the state and was dropped.
    Discarded,
    /// The fetch failed; the state is unchanged and a retry is available.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    state: WizardState,
    next_token: u64,
    pending: Option<Ticket>,
    failure: Option<FetchFailure>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            state: WizardState::Start,
            next_token: 0,
            pending: None,
            failure: None,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    /// The ticket awaiting a response, if any.
    pub fn pending(&self) -> Option<&Ticket> {
        self.pending.as_ref()
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        self.failure.as_ref()
    }

    fn invalid(&self, action: &'static str) -> WizardError {
        WizardError::InvalidTransition {
            action,
            step: self.step(),
        }
    }

    /// Stamps `request` with a fresh token. Any earlier ticket becomes stale.
    fn issue(&mut self, request: FetchRequest) -> Ticket {
        self.next_token += 1;
        let ticket = Ticket {
            token: self.next_token,
            request,
        };
        self.pending = Some(ticket.clone());
        self.failure = None;
        ticket
    }

    pub fn start(&mut self) -> WizardResult<()> {
        if self.step() != Step::Start {
            return Err(self.invalid("start"));
        }
        self.state = WizardState::PatientType;
        Ok(())
    }

    pub fn select_patient(&mut self, age_group: AgeGroup) -> WizardResult<()> {
        if self.step() != Step::PatientType {
            return Err(self.invalid("select a patient type"));
        }
        self.state = WizardState::BodyArea { age_group };
        Ok(())
    }

    /// Requests the panels of `body_area`. The wizard moves on once they arrive.
    pub fn select_body_area(&mut self, body_area: &str) -> WizardResult<Ticket> {
        let WizardState::BodyArea { age_group } = self.state else {
            return Err(self.invalid("select a body area"));
        };
        let body_area = body_area.trim();
        if body_area.is_empty() {
            return Err(WizardError::UnknownOption {
                kind: "body area",
                value: body_area.to_string(),
            });
        }

        Ok(self.issue(FetchRequest::Panels {
            age_group,
            body_area: body_area.to_string(),
        }))
    }

    /// Selects a panel, forgets any chosen condition and requests the panel's conditions.
    pub fn select_panel(&mut self, panel: &str) -> WizardResult<Ticket> {
        let WizardState::PanelCondition(picker) = &mut self.state else {
            return Err(self.invalid("select a panel"));
        };
        let Some(panel) = picker.panels.iter().find(|p| p.as_str() == panel).cloned() else {
            return Err(WizardError::UnknownOption {
                kind: "panel",
                value: panel.to_string(),
            });
        };

        picker.panel = Some(panel.clone());
        picker.condition = None;
        picker.conditions.clear();
        let request = FetchRequest::Conditions {
            age_group: picker.age_group,
            body_area: picker.body_area.clone(),
            panel,
        };

        Ok(self.issue(request))
    }

    pub fn select_condition(&mut self, condition: &str) -> WizardResult<()> {
        let WizardState::PanelCondition(picker) = &mut self.state else {
            return Err(self.invalid("select a condition"));
        };
        let Some(option) = picker.conditions.iter().find(|c| c.label == condition) else {
            return Err(WizardError::UnknownOption {
                kind: "condition",
                value: condition.to_string(),
            });
        };

        picker.condition = Some(option.label.clone());
        Ok(())
    }

    /// Requests scenarios for the chosen panel and condition.
    pub fn next(&mut self) -> WizardResult<Ticket> {
        let request = match &self.state {
            WizardState::PanelCondition(Picker {
                age_group,
                body_area,
                panel: Some(panel),
                condition: Some(condition),
                ..
            }) => FetchRequest::Scenarios {
                age_group: *age_group,
                body_area: body_area.clone(),
                panel: panel.clone(),
                condition: condition.clone(),
            },
            _ => return Err(self.invalid("continue without a panel and condition")),
        };

        Ok(self.issue(request))
    }

    /// Requests the classified procedures of `scenario_id`.
    pub fn select_scenario(&mut self, scenario_id: &str) -> WizardResult<Ticket> {
        let WizardState::ScenarioList(stage) = &self.state else {
            return Err(self.invalid("select a scenario"));
        };
        let Some(scenario) = stage
            .scenarios
            .iter()
            .find(|s| s.scenario_id == scenario_id)
        else {
            return Err(WizardError::UnknownOption {
                kind: "scenario",
                value: scenario_id.to_string(),
            });
        };

        let request = FetchRequest::Results {
            age_group: stage.picker.age_group,
            body_area: stage.picker.body_area.clone(),
            scenario: scenario.clone(),
        };

        Ok(self.issue(request))
    }

    /// Shows or hides the rarely/not appropriate bucket. Returns the new setting.
    pub fn toggle_not_appropriate(&mut self) -> WizardResult<bool> {
        let WizardState::Results(results) = &mut self.state else {
            return Err(self.invalid("toggle not appropriate results"));
        };
        results.show_not_appropriate = !results.show_not_appropriate;
        Ok(results.show_not_appropriate)
    }

    /// Re-issues the last failed fetch under a new token.
    pub fn retry(&mut self) -> WizardResult<Ticket> {
        let failure = self.failure.take().ok_or(WizardError::NothingToRetry)?;
        Ok(self.issue(failure.request))
    }

    /// Steps back one level. Any fetch in flight is abandoned.
    pub fn back(&mut self) -> WizardResult<Step> {
        let current = std::mem::replace(&mut self.state, WizardState::Start);
        match current.previous() {
            Some(previous) => {
                self.state = previous;
                self.pending = None;
                self.failure = None;
                Ok(self.step())
            }
            None => Err(self.invalid("go back")),
        }
    }

    /// Jumps back to an earlier step, keeping the choices made before it.
    pub fn go_to(&mut self, target: Step) -> WizardResult<()> {
        if target > self.step() {
            return Err(self.invalid("jump forward"));
        }
        while self.step() > target {
            self.back()?;
        }
        Ok(())
    }

    /// Discards every choice and returns to `Start`.
    pub fn start_again(&mut self) {
        *self = Self {
            next_token: self.next_token,
            ..Self::new()
        };
    }

    /// Applies the outcome of the fetch stamped with `token`.
    pub fn complete(
        &mut self,
        token: u64,
        outcome: Result<FetchResponse, ClientError>,
    ) -> Completion {
        let ticket = match self.pending.take() {
            Some(ticket) if ticket.token == token => ticket,
            other => {
                self.pending = other;
                tracing::debug!("dropping response for stale request {}", token);
                return Completion::Discarded;
            }
        };

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("fetch failed at {} step: {}", self.step(), err);
                self.failure = Some(FetchFailure {
                    request: ticket.request,
                    message: err.to_string(),
                });
                return Completion::Failed;
            }
        };

        let current = std::mem::replace(&mut self.state, WizardState::Start);
        let (next, completion) = apply(current, ticket.request, response);
        self.state = next;
        completion
    }
}

fn apply(
    state: WizardState,
    request: FetchRequest,
    response: FetchResponse,
) -> (WizardState, Completion) {
    match (state, request, response) {
        (
            WizardState::BodyArea { age_group },
            FetchRequest::Panels { body_area, .. },
            FetchResponse::Panels(panels),
        ) => (
            WizardState::PanelCondition(Picker {
                age_group,
                body_area,
                panels,
                panel: None,
                conditions: Vec::new(),
                condition: None,
            }),
            Completion::Applied,
        ),
        (
            WizardState::PanelCondition(mut picker),
            FetchRequest::Conditions { panel, .. },
            FetchResponse::Conditions(items),
        ) if picker.panel.as_deref() == Some(panel.as_str()) => {
            picker.conditions = ConditionOption::from_items(items);
            picker.condition = None;
            (WizardState::PanelCondition(picker), Completion::Applied)
        }
        (
            WizardState::PanelCondition(picker),
            FetchRequest::Scenarios {
                panel, condition, ..
            },
            FetchResponse::Scenarios(scenarios),
        ) => (
            WizardState::ScenarioList(ScenarioStage {
                picker,
                panel,
                condition,
                scenarios,
            }),
            Completion::Applied,
        ),
        (
            WizardState::ScenarioList(stage),
            FetchRequest::Results { scenario, .. },
            FetchResponse::Results(procedures),
        ) => (
            WizardState::Results(ResultsStage {
                stage,
                scenario,
                buckets: ResultBuckets::from_procedures(procedures),
                show_not_appropriate: false,
            }),
            Completion::Applied,
        ),
        (state, request, _) => {
            tracing::warn!(
                "response does not fit {} step for request {:?}",
                state.step(),
                request
            );
            (state, Completion::Discarded)
        }
    }
}
