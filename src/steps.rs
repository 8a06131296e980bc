//! Outer step controller for the three review steps.
//!
//! The controller only tracks position. Gating is the caller's job: `advance`
//! always moves (or completes), so callers check `can_advance` first.
use crate::record::AnnotationRecord;
use crate::validators::{context_complete, decomposition_complete, query_complete};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review steps in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ContextIntegration,
    QueryDecomposition,
    ParameterExtraction,
}

impl Step {
    pub const ALL: [Step; 3] = [
        Step::ContextIntegration,
        Step::QueryDecomposition,
        Step::ParameterExtraction,
    ];

    pub fn index(&self) -> usize {
        match self {
            Step::ContextIntegration => 0,
            Step::QueryDecomposition => 1,
            Step::ParameterExtraction => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Step::ALL.get(index).copied()
    }

    /// Return the stable string identifier used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::ContextIntegration => "context_integration",
            Step::QueryDecomposition => "query_decomposition",
            Step::ParameterExtraction => "parameter_extraction",
        }
    }

    /// Screen title.
    pub fn label(&self) -> &'static str {
        match self {
            Step::ContextIntegration => "查询上下文整合标注",
            Step::QueryDecomposition => "查询拆解标注",
            Step::ParameterExtraction => "槽位提取和消歧标注",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of moving the outer controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMove {
    Advanced { from: Step, to: Step },
    Completed,
    Retreated { from: Step, to: Step },
    Stayed { at: Step },
}

/// Gate for `step`. The parameter-extraction gate looks at the sub-query under
/// the cursor; an out-of-range index never passes.
pub fn step_gate(step: Step, record: &AnnotationRecord, query_index: usize) -> bool {
    match step {
        Step::ContextIntegration => context_complete(&record.context_integration),
        Step::QueryDecomposition => decomposition_complete(&record.query_decomposition),
        Step::ParameterExtraction => record
            .parameter_extractions
            .get(query_index)
            .is_some_and(query_complete),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepController {
    current: usize,
}

impl StepController {
    pub const TOTAL_STEPS: usize = Step::ALL.len();

    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Step {
        Step::ALL[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current == Self::TOTAL_STEPS - 1
    }

    /// Move to the next step, or mark the record completed on the last one.
    pub fn advance(&mut self, record: &mut AnnotationRecord) -> StepMove {
        if self.current < Self::TOTAL_STEPS - 1 {
            let from = self.current();
            self.current += 1;
            StepMove::Advanced {
                from,
                to: self.current(),
            }
        } else {
            record.completed = true;
            StepMove::Completed
        }
    }

    /// Move back one step; a no-op on the first step.
    pub fn retreat(&mut self) -> StepMove {
        if self.current > 0 {
            let from = self.current();
            self.current -= 1;
            StepMove::Retreated {
                from,
                to: self.current(),
            }
        } else {
            StepMove::Stayed {
                at: self.current(),
            }
        }
    }

    pub fn can_advance(&self, record: &AnnotationRecord, query_index: usize) -> bool {
        step_gate(self.current(), record, query_index)
    }
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;
