//! # Referral Wizard
//!
//! Guided selection that leads a clinician from patient type through body area, panel,
//! condition and scenario to a classified list of imaging procedures.
//!
//! - [`state`]: the pure state machine and its fetch tickets
//! - [`client`]: the [`ConditionsApi`] seam and its HTTP implementation
//! - [`session`]: a driver that fetches and applies responses in turn
//! - [`results`]: grouping of procedures into display buckets
//! - [`catalogue`]: the selectable body areas

pub mod catalogue;
pub mod client;
pub mod error;
pub mod results;
pub mod session;
pub mod state;

pub use catalogue::{find_body_area, BodyAreaOption, BODY_AREAS};
pub use client::{ConditionsApi, HttpConditionsClient};
pub use error::{ClientError, WizardError, WizardResult};
pub use results::{ResultBuckets, BUCKET_LIMIT};
pub use session::WizardSession;
pub use state::{
    Completion, ConditionOption, FetchFailure, FetchRequest, FetchResponse, Picker,
    ResultsStage, ScenarioStage, Step, Ticket, Wizard, WizardState,
};
