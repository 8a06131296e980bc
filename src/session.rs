//! Session context: one record plus the controllers that walk it.
//!
//! Drivers hand intents to `Session::apply`; the session checks the step an
//! intent belongs to, enforces the advance gate, and routes the mutation to
//! the record, the `StepController`, or the `QueryCursor`.
use crate::catalog::Catalog;
use crate::config::{ReviewConfig, SuggestionPolicy};
use crate::cursor::{CursorMove, QueryCursor};
use crate::error::WizardError;
use crate::intent::Intent;
use crate::record::{AnnotationRecord, UserChoice};
use crate::steps::{Step, StepController, StepMove};
use crate::validators::{context_complete, decomposition_complete, missing_fields};
use serde::Serialize;
use tracing::{debug, info, warn};

/// One incomplete field blocking the advance gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blocker {
    /// Record path of the field, e.g. `parameterExtractions[1].groupBy.userExtractedInfo`.
    pub field: String,
    pub reason: String,
}

/// Effect of one applied intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Updated,
    Moved { step: Step, query_index: usize },
    Blocked { blockers: Vec<Blocker> },
    Completed,
}

/// Snapshot of where the session stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub step: Step,
    pub step_number: usize,
    pub total_steps: usize,
    pub step_label: &'static str,
    pub query_index: usize,
    pub query_count: usize,
    pub can_advance: bool,
    pub completed: bool,
    pub blockers: Vec<Blocker>,
    pub next_action: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    record: AnnotationRecord,
    steps: StepController,
    cursor: QueryCursor,
    policy: SuggestionPolicy,
    catalog: Catalog,
}

impl Session {
    /// Start a session over pipeline output.
    ///
    /// A record with no sub-queries cannot pass the parameter step and is
    /// rejected up front.
    pub fn new(record: AnnotationRecord, config: &ReviewConfig) -> Result<Self, WizardError> {
        if record.parameter_extractions.is_empty() {
            return Err(WizardError::NoSubQueries);
        }
        let decomposed = record.query_decomposition.decomposed_queries.len();
        let extracted = record.parameter_extractions.len();
        if decomposed != extracted {
            warn!(
                decomposed,
                extracted, "decomposed query count differs from parameter extraction count"
            );
        }
        if record.completed {
            warn!("record is already marked completed; no further edits are accepted");
        }
        Ok(Self {
            record,
            steps: StepController::new(),
            cursor: QueryCursor::new(),
            policy: config.suggestion_policy,
            catalog: config.catalog(),
        })
    }

    pub fn record(&self) -> &AnnotationRecord {
        &self.record
    }

    pub fn into_record(self) -> AnnotationRecord {
        self.record
    }

    pub fn step(&self) -> Step {
        self.steps.current()
    }

    pub fn query_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_completed(&self) -> bool {
        self.record.completed
    }

    pub fn can_advance(&self) -> bool {
        self.steps.can_advance(&self.record, self.cursor.index())
    }

    pub fn apply(&mut self, intent: Intent) -> Result<Outcome, WizardError> {
        if self.record.completed {
            return Err(WizardError::Completed);
        }
        debug!(intent = intent.name(), step = %self.step(), query_index = self.cursor.index(), "apply intent");
        match intent {
            Intent::SelectChoice { choice } => {
                self.require(Step::ContextIntegration)?;
                self.record
                    .context_integration
                    .select(choice, self.policy);
            }
            Intent::SetSuggestion { text } => {
                self.require(Step::ContextIntegration)?;
                self.record
                    .context_integration
                    .set_suggestion(text, self.policy)?;
            }
            Intent::SetDecompositionCorrect { is_correct } => {
                self.require(Step::QueryDecomposition)?;
                self.record.query_decomposition.set_correct(is_correct);
            }
            Intent::AddCustomQuery { text } => {
                self.require(Step::QueryDecomposition)?;
                self.record.query_decomposition.add_custom_query(&text)?;
            }
            Intent::RemoveCustomQuery { index } => {
                self.require(Step::QueryDecomposition)?;
                self.record.query_decomposition.remove_custom_query(index)?;
            }
            Intent::SetJudgment { kind, is_correct } => {
                self.require(Step::ParameterExtraction)?;
                self.cursor.set_judgment(&mut self.record, kind, is_correct)?;
            }
            Intent::SetUserField { kind, field, value } => {
                self.require(Step::ParameterExtraction)?;
                self.cursor
                    .set_user_field(&mut self.record, kind, field, value)?;
            }
            Intent::ApplyCorrection { correction } => {
                self.require(Step::ParameterExtraction)?;
                correction.check_dimensions(&self.catalog.dimensions)?;
                self.cursor.apply_correction(&mut self.record, &correction)?;
            }
            Intent::SyncFromFirst { kind } => {
                self.require(Step::ParameterExtraction)?;
                self.cursor.sync_from_first(&mut self.record, kind)?;
            }
            Intent::AnnotateStage { stage, values } => {
                self.require(Step::ParameterExtraction)?;
                self.cursor
                    .annotate_intermediate_stage(&mut self.record, stage, values)?;
            }
            Intent::Next => return Ok(self.next()),
            Intent::Back => return Ok(self.back()),
        }
        Ok(Outcome::Updated)
    }

    fn require(&self, expected: Step) -> Result<(), WizardError> {
        let actual = self.step();
        if actual != expected {
            return Err(WizardError::WrongStep { expected, actual });
        }
        Ok(())
    }

    fn next(&mut self) -> Outcome {
        if !self.can_advance() {
            let blockers = self.blockers();
            debug!(count = blockers.len(), "advance blocked");
            return Outcome::Blocked { blockers };
        }
        let step_move = if self.step() == Step::ParameterExtraction {
            match self.cursor.advance(&mut self.steps, &mut self.record) {
                CursorMove::Step { step } => step,
                CursorMove::NextQuery { .. } | CursorMove::PreviousQuery { .. } => {
                    return self.moved();
                }
            }
        } else {
            self.steps.advance(&mut self.record)
        };
        match step_move {
            StepMove::Completed => {
                info!(
                    queries = self.record.parameter_extractions.len(),
                    "annotation completed"
                );
                Outcome::Completed
            }
            StepMove::Advanced { to, .. } => {
                if to == Step::ParameterExtraction {
                    self.cursor.reset();
                }
                self.moved()
            }
            StepMove::Retreated { .. } | StepMove::Stayed { .. } => self.moved(),
        }
    }

    fn back(&mut self) -> Outcome {
        if self.step() == Step::ParameterExtraction {
            self.cursor.retreat(&mut self.steps);
        } else {
            self.steps.retreat();
        }
        self.moved()
    }

    fn moved(&self) -> Outcome {
        debug!(step = %self.step(), query_index = self.cursor.index(), "moved");
        Outcome::Moved {
            step: self.step(),
            query_index: self.cursor.index(),
        }
    }

    /// Incomplete fields on the current step (or current sub-query).
    pub fn blockers(&self) -> Vec<Blocker> {
        let mut blockers = Vec::new();
        match self.step() {
            Step::ContextIntegration => {
                let context = &self.record.context_integration;
                if !context_complete(context) {
                    let (field, reason) = if context.user_choice == UserChoice::Unset {
                        ("contextIntegration.userChoice", "no option selected")
                    } else {
                        (
                            "contextIntegration.userSuggestion",
                            "replace needs a suggested integration",
                        )
                    };
                    blockers.push(Blocker {
                        field: field.to_string(),
                        reason: reason.to_string(),
                    });
                }
            }
            Step::QueryDecomposition => {
                if !decomposition_complete(&self.record.query_decomposition) {
                    blockers.push(Blocker {
                        field: "queryDecomposition.userDecomposition".to_string(),
                        reason: "incorrect decomposition needs at least one custom query"
                            .to_string(),
                    });
                }
            }
            Step::ParameterExtraction => {
                let index = self.cursor.index();
                if let Some(query) = self.record.parameter_extractions.get(index) {
                    for (kind, judgment) in query.parameters.iter() {
                        for field in missing_fields(kind, judgment) {
                            blockers.push(Blocker {
                                field: format!("parameterExtractions[{index}].{kind}.{field}"),
                                reason: format!("{} marked incorrect without a correction", kind.label()),
                            });
                        }
                    }
                }
            }
        }
        blockers
    }

    pub fn status(&self) -> SessionStatus {
        let blockers = self.blockers();
        let can_advance = blockers.is_empty() && self.can_advance();
        SessionStatus {
            step: self.step(),
            step_number: self.step().index() + 1,
            total_steps: StepController::TOTAL_STEPS,
            step_label: self.step().label(),
            query_index: self.cursor.index(),
            query_count: self.record.parameter_extractions.len(),
            can_advance,
            completed: self.record.completed,
            next_action: self.next_action(can_advance, &blockers),
            blockers,
        }
    }

    fn next_action(&self, can_advance: bool, blockers: &[Blocker]) -> String {
        if self.record.completed {
            return "done: record is ready for submission".to_string();
        }
        if let Some(first) = blockers.first() {
            return format!("fill {}", first.field);
        }
        if !can_advance {
            return "select a verdict".to_string();
        }
        if self.steps.is_last() {
            let last_query = self.cursor.index() + 1 >= self.record.parameter_extractions.len();
            return if last_query {
                "next: submit annotations".to_string()
            } else {
                format!("next: review sub-query {}", self.cursor.index() + 2)
            };
        }
        match Step::from_index(self.step().index() + 1) {
            Some(following) => format!("next: {}", following.label()),
            None => "next".to_string(),
        }
    }

    /// True when the decomposition step's free-text affordances apply.
    pub fn wants_custom_queries(&self) -> bool {
        !self.record.query_decomposition.is_correct
    }

    /// True when the suggestion field for `replace` should be shown.
    pub fn wants_suggestion(&self) -> bool {
        self.record.context_integration.wants_suggestion()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
