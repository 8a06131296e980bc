//! Annotation record schema.
//!
//! The record is the single artifact of a review session. Read-only fields are
//! supplied by the upstream query-understanding pipeline; everything else is
//! written by reviewer actions. Field names mirror the upstream JSON so
//! pipeline output deserializes without a translation layer.
mod parameters;
mod stages;

pub use parameters::{ParameterJudgment, ParameterKind, ParameterSet, UserField};
pub use stages::{
    IntermediateAnnotations, IntermediateResults, IntermediateStage, StageCorrection,
};

use crate::config::SuggestionPolicy;
use crate::error::WizardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root aggregate for one review session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    pub context_integration: ContextIntegration,
    pub query_decomposition: QueryDecomposition,
    pub parameter_extractions: Vec<QueryAnnotation>,
    #[serde(default)]
    pub completed: bool,
}

/// Reviewer verdict on the system's context integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserChoice {
    #[default]
    #[serde(alias = "")]
    Unset,
    #[serde(alias = "A")]
    Accept,
    #[serde(alias = "B")]
    Reject,
    #[serde(alias = "C")]
    Replace,
}

impl UserChoice {
    pub const OPTIONS: [UserChoice; 3] = [UserChoice::Accept, UserChoice::Reject, UserChoice::Replace];

    /// Return the stable string identifier used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserChoice::Unset => "unset",
            UserChoice::Accept => "accept",
            UserChoice::Reject => "reject",
            UserChoice::Replace => "replace",
        }
    }

    /// Option text shown to the reviewer.
    pub fn label(&self) -> &'static str {
        match self {
            UserChoice::Unset => "未选择",
            UserChoice::Accept => "A：整合正确",
            UserChoice::Reject => "B：不要整合",
            UserChoice::Replace => "C：应该整合成其他内容",
        }
    }
}

impl fmt::Display for UserChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserChoice {
    type Err = WizardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unset" => Ok(UserChoice::Unset),
            "accept" | "a" => Ok(UserChoice::Accept),
            "reject" | "b" => Ok(UserChoice::Reject),
            "replace" | "c" => Ok(UserChoice::Replace),
            _ => Err(WizardError::unknown("choice", value)),
        }
    }
}

/// Step 1 input and verdict: how a follow-up query was merged with history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextIntegration {
    pub original_query: String,
    pub follow_up_query: String,
    pub system_integration: String,
    #[serde(default)]
    pub user_choice: UserChoice,
    #[serde(default)]
    pub user_suggestion: String,
}

impl ContextIntegration {
    /// Record the reviewer's choice.
    ///
    /// Leaving `Replace` empties the suggestion under `SuggestionPolicy::Clear`.
    pub fn select(&mut self, choice: UserChoice, policy: SuggestionPolicy) {
        if choice != UserChoice::Replace && policy == SuggestionPolicy::Clear {
            self.user_suggestion.clear();
        }
        self.user_choice = choice;
    }

    /// Store the suggested integration.
    ///
    /// Under `SuggestionPolicy::Clear` a suggestion only exists alongside
    /// `Replace`, so other choices refuse it.
    pub fn set_suggestion(
        &mut self,
        text: impl Into<String>,
        policy: SuggestionPolicy,
    ) -> Result<(), WizardError> {
        if policy == SuggestionPolicy::Clear && self.user_choice != UserChoice::Replace {
            return Err(WizardError::SuggestionNotOffered(self.user_choice));
        }
        self.user_suggestion = text.into();
        Ok(())
    }

    /// True when the free-text suggestion field should be shown.
    pub fn wants_suggestion(&self) -> bool {
        self.user_choice == UserChoice::Replace
    }
}

/// Step 2 input and verdict: the split of one multi-metric query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDecomposition {
    pub original_query: String,
    pub decomposed_queries: Vec<String>,
    #[serde(default = "default_true")]
    pub is_correct: bool,
    #[serde(default)]
    pub user_decomposition: Vec<String>,
}

impl QueryDecomposition {
    /// Set the verdict; marking it correct discards any custom decomposition.
    pub fn set_correct(&mut self, is_correct: bool) {
        self.is_correct = is_correct;
        if is_correct {
            self.user_decomposition.clear();
        }
    }

    pub fn add_custom_query(&mut self, text: &str) -> Result<(), WizardError> {
        if self.is_correct {
            return Err(WizardError::DecompositionMarkedCorrect);
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(WizardError::EmptyText {
                what: "custom query",
            });
        }
        self.user_decomposition.push(trimmed.to_string());
        Ok(())
    }

    pub fn remove_custom_query(&mut self, index: usize) -> Result<String, WizardError> {
        if self.is_correct {
            return Err(WizardError::DecompositionMarkedCorrect);
        }
        let len = self.user_decomposition.len();
        if index >= len {
            return Err(WizardError::IndexOutOfRange { index, len });
        }
        Ok(self.user_decomposition.remove(index))
    }
}

/// Per sub-query parameter judgments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnnotation {
    pub query: String,
    pub parameters: ParameterSet,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
