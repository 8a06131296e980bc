use super::{
    AnnotationRecord, ContextIntegration, IntermediateAnnotations, IntermediateStage,
    ParameterJudgment, ParameterKind, QueryDecomposition, StageCorrection, UserChoice, UserField,
};
use crate::config::SuggestionPolicy;
use crate::error::WizardError;

fn context() -> ContextIntegration {
    ContextIntegration {
        original_query: "天津今年佣金是多少？".to_string(),
        follow_up_query: "武汉的呢？".to_string(),
        system_integration: "武汉今年佣金是多少？".to_string(),
        user_choice: UserChoice::Unset,
        user_suggestion: String::new(),
    }
}

fn decomposition() -> QueryDecomposition {
    QueryDecomposition {
        original_query: "武汉今年佣金和单量是多少？".to_string(),
        decomposed_queries: vec!["武汉今年佣金是多少？".to_string()],
        is_correct: true,
        user_decomposition: Vec::new(),
    }
}

#[test]
fn leaving_replace_clears_suggestion_under_clear_policy() {
    let mut context = context();
    context.select(UserChoice::Replace, SuggestionPolicy::Clear);
    context
        .set_suggestion("武汉今年新签佣金是多少？", SuggestionPolicy::Clear)
        .expect("replace takes a suggestion");
    context.select(UserChoice::Accept, SuggestionPolicy::Clear);
    assert_eq!(context.user_choice, UserChoice::Accept);
    assert!(context.user_suggestion.is_empty());
}

#[test]
fn retain_policy_keeps_suggestion() {
    let mut context = context();
    context.select(UserChoice::Replace, SuggestionPolicy::Retain);
    context
        .set_suggestion("foo", SuggestionPolicy::Retain)
        .expect("replace takes a suggestion");
    context.select(UserChoice::Reject, SuggestionPolicy::Retain);
    assert_eq!(context.user_suggestion, "foo");
    assert!(!context.wants_suggestion());
}

#[test]
fn clear_policy_refuses_suggestion_without_replace() {
    let mut context = context();
    assert_eq!(
        context.set_suggestion("stale", SuggestionPolicy::Clear),
        Err(WizardError::SuggestionNotOffered(UserChoice::Unset))
    );
    context.select(UserChoice::Accept, SuggestionPolicy::Clear);
    assert_eq!(
        context.set_suggestion("stale", SuggestionPolicy::Clear),
        Err(WizardError::SuggestionNotOffered(UserChoice::Accept))
    );
    assert!(context.user_suggestion.is_empty());

    context.select(UserChoice::Reject, SuggestionPolicy::Retain);
    context
        .set_suggestion("kept", SuggestionPolicy::Retain)
        .expect("retain accepts any choice");
    assert_eq!(context.user_suggestion, "kept");
}

#[test]
fn user_choice_accepts_letters_and_names() {
    assert_eq!("A".parse::<UserChoice>(), Ok(UserChoice::Accept));
    assert_eq!("reject".parse::<UserChoice>(), Ok(UserChoice::Reject));
    assert_eq!(" c ".parse::<UserChoice>(), Ok(UserChoice::Replace));
    assert!(matches!(
        "d".parse::<UserChoice>(),
        Err(WizardError::UnknownName { what: "choice", .. })
    ));
}

#[test]
fn user_choice_reads_upstream_letter_codes() {
    let choice: UserChoice = serde_json::from_str("\"C\"").expect("parse letter");
    assert_eq!(choice, UserChoice::Replace);
    let unset: UserChoice = serde_json::from_str("\"\"").expect("parse empty");
    assert_eq!(unset, UserChoice::Unset);
    assert_eq!(
        serde_json::to_string(&UserChoice::Accept).expect("serialize"),
        "\"accept\""
    );
}

#[test]
fn marking_decomposition_correct_discards_custom_queries() {
    let mut decomposition = decomposition();
    decomposition.set_correct(false);
    decomposition
        .add_custom_query("  武汉今年单量是多少？ ")
        .expect("add custom query");
    assert_eq!(decomposition.user_decomposition, vec!["武汉今年单量是多少？"]);

    decomposition.set_correct(true);
    assert!(decomposition.user_decomposition.is_empty());
    decomposition.set_correct(false);
    assert!(decomposition.user_decomposition.is_empty());
}

#[test]
fn custom_queries_require_incorrect_verdict_and_text() {
    let mut decomposition = decomposition();
    assert_eq!(
        decomposition.add_custom_query("x"),
        Err(WizardError::DecompositionMarkedCorrect)
    );
    decomposition.set_correct(false);
    assert_eq!(
        decomposition.add_custom_query("   "),
        Err(WizardError::EmptyText {
            what: "custom query"
        })
    );
    decomposition.add_custom_query("a").expect("add a");
    decomposition.add_custom_query("b").expect("add b");
    assert_eq!(
        decomposition.remove_custom_query(2),
        Err(WizardError::IndexOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(decomposition.remove_custom_query(0), Ok("a".to_string()));
    assert_eq!(decomposition.user_decomposition, vec!["b"]);
}

#[test]
fn correct_verdict_clears_both_correction_fields() {
    let mut judgment = ParameterJudgment::from_system("佣金", "61535：总新签佣金");
    judgment.set_correct(false);
    judgment.set_user_field(UserField::ExtractedInfo, "单量");
    judgment.set_user_field(UserField::DisambiguationResult, "61536：总新签单量");
    assert_eq!(judgment.user_field(UserField::ExtractedInfo), "单量");

    judgment.set_correct(true);
    assert!(judgment.user_extracted_info.is_empty());
    assert!(judgment.user_disambiguation_result.is_empty());
    assert_eq!(judgment.extracted_info, "佣金");
}

#[test]
fn display_disambiguation_fixes_group_by_typo() {
    let judgment = ParameterJudgment::from_system("每月", "按\"月：month\"进行分许");
    assert_eq!(judgment.display_disambiguation(), "按\"月：month\"进行分组");
    assert_eq!(judgment.disambiguation_result, "按\"月：month\"进行分许");

    let twice = ParameterJudgment::from_system("每月，各大区", "按\"月\"分许；按\"大区\"分许");
    assert_eq!(twice.display_disambiguation(), "按\"月\"分组；按\"大区\"分组");
}

#[test]
fn parameter_kind_parses_loose_spellings() {
    assert_eq!("timeRange".parse::<ParameterKind>(), Ok(ParameterKind::TimeRange));
    assert_eq!("time_range".parse::<ParameterKind>(), Ok(ParameterKind::TimeRange));
    assert_eq!("GROUP-BY".parse::<ParameterKind>(), Ok(ParameterKind::GroupBy));
    assert!("limit".parse::<ParameterKind>().is_err());
}

#[test]
fn parameter_set_rejects_missing_kind() {
    let judgment = serde_json::json!({ "extractedInfo": "x", "disambiguationResult": "y" });
    let incomplete = serde_json::json!({
        "metric": judgment,
        "timeRange": judgment,
        "constraints": judgment,
        "groupBy": judgment,
        "sorting": judgment,
    });
    let err = serde_json::from_value::<super::ParameterSet>(incomplete)
        .expect_err("calculation is required");
    assert!(err.to_string().contains("calculation"));
}

#[test]
fn parameter_set_rejects_duplicate_kind() {
    let judgment = r#"{ "extractedInfo": "x", "disambiguationResult": "y" }"#;
    let text = format!(
        r#"{{ "metric": {judgment}, "metric": {judgment}, "timeRange": {judgment},
            "constraints": {judgment}, "groupBy": {judgment}, "sorting": {judgment},
            "calculation": {judgment} }}"#
    );
    let err = serde_json::from_str::<super::ParameterSet>(&text)
        .expect_err("metric appears twice");
    assert!(err.to_string().contains("duplicate field `metric`"), "{err}");
}

#[test]
fn record_defaults_reviewer_fields_when_absent() {
    let judgment = serde_json::json!({ "extractedInfo": "x", "disambiguationResult": "y" });
    let value = serde_json::json!({
        "contextIntegration": {
            "originalQuery": "q",
            "followUpQuery": "f",
            "systemIntegration": "s",
        },
        "queryDecomposition": {
            "originalQuery": "q",
            "decomposedQueries": ["q1"],
        },
        "parameterExtractions": [{
            "query": "q1",
            "parameters": {
                "metric": judgment,
                "timeRange": judgment,
                "constraints": judgment,
                "groupBy": judgment,
                "sorting": judgment,
                "calculation": judgment,
            }
        }]
    });
    let record: AnnotationRecord = serde_json::from_value(value).expect("parse record");
    assert_eq!(record.context_integration.user_choice, UserChoice::Unset);
    assert!(record.query_decomposition.is_correct);
    assert!(!record.completed);
    let metric = record.parameter_extractions[0]
        .parameters
        .get(ParameterKind::Metric);
    assert!(metric.is_correct);
    assert!(metric.annotations.is_none());
}

#[test]
fn stage_annotations_serialize_only_edited_stages() {
    let mut annotations = IntermediateAnnotations::default();
    assert!(annotations.is_empty());
    annotations.set(
        IntermediateStage::FilteredByDimensions,
        StageCorrection {
            original_value: vec!["61535：总新签佣金".to_string()],
            annotated_value: vec!["61536：总新签单量".to_string()],
        },
    );
    assert!(!annotations.is_empty());
    let json = serde_json::to_value(&annotations).expect("serialize annotations");
    let object = json.as_object().expect("object");
    assert_eq!(object.len(), 1);
    assert_eq!(
        json["filteredByDimensions"]["annotatedValue"][0],
        "61536：总新签单量"
    );
}

#[test]
fn stage_values_split_on_either_comma() {
    assert_eq!(
        StageCorrection::values_from_text("a, b，c ,, "),
        vec!["a", "b", "c"]
    );
    assert_eq!(
        "filtered_by_golden_rules".parse::<IntermediateStage>(),
        Ok(IntermediateStage::FilteredByGoldenRules)
    );
}
