//! Sub-query cursor nested inside the parameter-extraction step.
//!
//! Moving past the last sub-query (or before the first) hands control to the
//! outer `StepController`. Judgment edits always target the sub-query under
//! the cursor.
use crate::corrections::Correction;
use crate::error::WizardError;
use crate::record::{
    AnnotationRecord, IntermediateStage, ParameterJudgment, ParameterKind, QueryAnnotation,
    StageCorrection, UserField,
};
use crate::steps::{StepController, StepMove};
use crate::validators::query_complete;

/// Result of moving the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    NextQuery { index: usize },
    PreviousQuery { index: usize },
    Step { step: StepMove },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCursor {
    index: usize,
}

impl QueryCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Back to the first sub-query, used when the step is re-entered.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Next sub-query, or the outer step's advance (terminal) on the last one.
    pub fn advance(
        &mut self,
        steps: &mut StepController,
        record: &mut AnnotationRecord,
    ) -> CursorMove {
        if self.index + 1 < record.parameter_extractions.len() {
            self.index += 1;
            CursorMove::NextQuery { index: self.index }
        } else {
            CursorMove::Step {
                step: steps.advance(record),
            }
        }
    }

    /// Previous sub-query, or the outer step's retreat on the first one.
    pub fn retreat(&mut self, steps: &mut StepController) -> CursorMove {
        if self.index > 0 {
            self.index -= 1;
            CursorMove::PreviousQuery { index: self.index }
        } else {
            CursorMove::Step {
                step: steps.retreat(),
            }
        }
    }

    pub fn can_advance(&self, record: &AnnotationRecord) -> bool {
        record
            .parameter_extractions
            .get(self.index)
            .is_some_and(query_complete)
    }

    pub fn current<'r>(&self, record: &'r AnnotationRecord) -> Result<&'r QueryAnnotation, WizardError> {
        record
            .parameter_extractions
            .get(self.index)
            .ok_or(WizardError::IndexOutOfRange {
                index: self.index,
                len: record.parameter_extractions.len(),
            })
    }

    fn judgment_mut<'r>(
        &self,
        record: &'r mut AnnotationRecord,
        kind: ParameterKind,
    ) -> Result<&'r mut ParameterJudgment, WizardError> {
        let len = record.parameter_extractions.len();
        record
            .parameter_extractions
            .get_mut(self.index)
            .map(|query| query.parameters.get_mut(kind))
            .ok_or(WizardError::IndexOutOfRange {
                index: self.index,
                len,
            })
    }

    pub fn set_judgment(
        &self,
        record: &mut AnnotationRecord,
        kind: ParameterKind,
        is_correct: bool,
    ) -> Result<(), WizardError> {
        self.judgment_mut(record, kind)?.set_correct(is_correct);
        Ok(())
    }

    pub fn set_user_field(
        &self,
        record: &mut AnnotationRecord,
        kind: ParameterKind,
        field: UserField,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.judgment_mut(record, kind)?.set_user_field(field, value);
        Ok(())
    }

    /// Write a typed correction into the judgment of its kind.
    pub fn apply_correction(
        &self,
        record: &mut AnnotationRecord,
        correction: &Correction,
    ) -> Result<(), WizardError> {
        correction.apply(self.judgment_mut(record, correction.kind())?)
    }

    /// Copy the first sub-query's verdict for `kind` onto the current one.
    pub fn sync_from_first(
        &self,
        record: &mut AnnotationRecord,
        kind: ParameterKind,
    ) -> Result<(), WizardError> {
        if !kind.syncable() {
            return Err(WizardError::SyncNotOffered(kind));
        }
        if self.index == 0 {
            return Err(WizardError::SyncOnFirstQuery);
        }
        let source = record
            .parameter_extractions
            .first()
            .map(|query| query.parameters.get(kind).clone())
            .ok_or(WizardError::NoSubQueries)?;
        self.judgment_mut(record, kind)?.copy_verdict_from(&source);
        Ok(())
    }

    /// Record a reviewer fix for one metric pipeline stage.
    ///
    /// The stage's original list is captured next to the fix; the judgment's
    /// own system output and verdict are untouched.
    pub fn annotate_intermediate_stage(
        &self,
        record: &mut AnnotationRecord,
        stage: IntermediateStage,
        corrected: Vec<String>,
    ) -> Result<(), WizardError> {
        let metric = self.judgment_mut(record, ParameterKind::Metric)?;
        let original_value = metric
            .intermediate_results
            .as_ref()
            .map(|results| results.get(stage).to_vec())
            .unwrap_or_default();
        metric.annotations.get_or_insert_with(Default::default).set(
            stage,
            StageCorrection {
                original_value,
                annotated_value: corrected,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
