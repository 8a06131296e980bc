//! Typed errors for reviewer actions.
//!
//! Incomplete steps are not errors; they surface as gate state. These variants
//! cover misuse of the workflow (wrong step, bad index, terminal record) and
//! malformed correction input.
use crate::record::{ParameterKind, UserChoice};
use crate::steps::Step;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("record has no parameter extractions to review")]
    NoSubQueries,

    #[error("session already completed; the record is terminal")]
    Completed,

    #[error("action belongs to the {expected} step (current step: {actual})")]
    WrongStep { expected: Step, actual: Step },

    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{what} must be non-empty")]
    EmptyText { what: &'static str },

    #[error("suggestion is only accepted for the `replace` choice (current choice: {0})")]
    SuggestionNotOffered(UserChoice),

    #[error("decomposition is marked correct; mark it incorrect before editing custom queries")]
    DecompositionMarkedCorrect,

    #[error("sync is not offered on the first sub-query")]
    SyncOnFirstQuery,

    #[error("sync is not offered for {0}")]
    SyncNotOffered(ParameterKind),

    #[error("invalid {kind} correction: {reason}")]
    InvalidCorrection { kind: ParameterKind, reason: String },

    #[error("unknown {what} {value:?}")]
    UnknownName { what: &'static str, value: String },
}

impl WizardError {
    pub(crate) fn invalid(kind: ParameterKind, reason: impl Into<String>) -> Self {
        WizardError::InvalidCorrection {
            kind,
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown(what: &'static str, value: &str) -> Self {
        WizardError::UnknownName {
            what,
            value: value.to_string(),
        }
    }
}
