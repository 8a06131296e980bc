//! Completeness predicates for single fields, judgments, and whole steps.
//!
//! Everything here is pure; gates in `steps` and `cursor` delegate to these.
use crate::record::{
    ContextIntegration, ParameterJudgment, ParameterKind, QueryAnnotation, QueryDecomposition,
    UserChoice, UserField,
};

/// A free-text field counts as filled once it has non-whitespace content.
pub fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn context_complete(context: &ContextIntegration) -> bool {
    match context.user_choice {
        UserChoice::Unset => false,
        UserChoice::Replace => is_filled(&context.user_suggestion),
        UserChoice::Accept | UserChoice::Reject => true,
    }
}

pub fn decomposition_complete(decomposition: &QueryDecomposition) -> bool {
    decomposition.is_correct || !decomposition.user_decomposition.is_empty()
}

/// Correction fields a judgment of `kind` must carry when marked incorrect.
pub fn required_fields(kind: ParameterKind) -> &'static [UserField] {
    if kind.requires_disambiguation() {
        &[UserField::ExtractedInfo, UserField::DisambiguationResult]
    } else {
        &[UserField::ExtractedInfo]
    }
}

/// Required correction fields that are still blank.
pub fn missing_fields(kind: ParameterKind, judgment: &ParameterJudgment) -> Vec<UserField> {
    if judgment.is_correct {
        return Vec::new();
    }
    required_fields(kind)
        .iter()
        .copied()
        .filter(|field| !is_filled(judgment.user_field(*field)))
        .collect()
}

pub fn judgment_complete(kind: ParameterKind, judgment: &ParameterJudgment) -> bool {
    judgment.is_correct
        || required_fields(kind)
            .iter()
            .all(|field| is_filled(judgment.user_field(*field)))
}

pub fn query_complete(query: &QueryAnnotation) -> bool {
    query
        .parameters
        .iter()
        .all(|(kind, judgment)| judgment_complete(kind, judgment))
}

#[cfg(test)]
#[path = "validators_tests.rs"]
mod tests;
