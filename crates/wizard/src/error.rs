use crate::state::Step;

/// Failures talking to the conditions API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with `success: false`.
    #[error("server rejected request: {0}")]
    Rejected(String),
}

/// An action that is not valid in the wizard's current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("cannot {action} at step {step}")]
    InvalidTransition { action: &'static str, step: Step },
    #[error("unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },
    #[error("no failed request to retry")]
    NothingToRetry,
}

pub type WizardResult<T> = std::result::Result<T, WizardError>;
