use super::{CursorMove, QueryCursor};
use crate::corrections::Correction;
use crate::error::WizardError;
use crate::record::{
    AnnotationRecord, IntermediateStage, ParameterJudgment, ParameterKind, UserField,
};
use crate::sample::sample_record;
use crate::steps::{Step, StepController, StepMove};

/// Sample record with the step controller parked on parameter extraction.
fn at_parameters() -> (AnnotationRecord, StepController) {
    let mut record = sample_record();
    let mut steps = StepController::new();
    steps.advance(&mut record);
    steps.advance(&mut record);
    (record, steps)
}

fn judgment(record: &AnnotationRecord, index: usize, kind: ParameterKind) -> &ParameterJudgment {
    record.parameter_extractions[index].parameters.get(kind)
}

#[test]
fn advance_on_last_query_completes_record() {
    let (mut record, mut steps) = at_parameters();
    let mut cursor = QueryCursor::new();
    assert_eq!(
        cursor.advance(&mut steps, &mut record),
        CursorMove::NextQuery { index: 1 }
    );
    assert_eq!(
        cursor.advance(&mut steps, &mut record),
        CursorMove::NextQuery { index: 2 }
    );
    assert!(!record.completed);
    assert_eq!(
        cursor.advance(&mut steps, &mut record),
        CursorMove::Step {
            step: StepMove::Completed
        }
    );
    assert!(record.completed);
    assert_eq!(cursor.index(), 2);
}

#[test]
fn retreat_from_first_query_leaves_the_step() {
    let (mut record, mut steps) = at_parameters();
    let mut cursor = QueryCursor::new();
    cursor.advance(&mut steps, &mut record);
    assert_eq!(
        cursor.retreat(&mut steps),
        CursorMove::PreviousQuery { index: 0 }
    );
    assert_eq!(
        cursor.retreat(&mut steps),
        CursorMove::Step {
            step: StepMove::Retreated {
                from: Step::ParameterExtraction,
                to: Step::QueryDecomposition,
            }
        }
    );
    assert_eq!(cursor.index(), 0);
}

#[test]
fn gate_follows_current_query_only() {
    let (mut record, mut steps) = at_parameters();
    let mut cursor = QueryCursor::new();
    cursor
        .set_judgment(&mut record, ParameterKind::Sorting, false)
        .expect("set judgment");
    assert!(!cursor.can_advance(&record));

    cursor.advance(&mut steps, &mut record);
    assert!(cursor.can_advance(&record));
    let current = cursor.current(&record).expect("current query");
    assert_eq!(current.query, record.parameter_extractions[1].query);
}

#[test]
fn sync_copies_verdict_and_corrections_from_first_query() {
    let (mut record, mut steps) = at_parameters();
    let mut cursor = QueryCursor::new();
    cursor
        .set_judgment(&mut record, ParameterKind::GroupBy, false)
        .expect("set judgment");
    cursor
        .set_user_field(&mut record, ParameterKind::GroupBy, UserField::ExtractedInfo, "每季度")
        .expect("set extracted");
    cursor
        .set_user_field(
            &mut record,
            ParameterKind::GroupBy,
            UserField::DisambiguationResult,
            "按\"季度\"进行分组",
        )
        .expect("set disambiguation");

    cursor.advance(&mut steps, &mut record);
    cursor
        .sync_from_first(&mut record, ParameterKind::GroupBy)
        .expect("sync");
    let synced = judgment(&record, 1, ParameterKind::GroupBy);
    assert!(!synced.is_correct);
    assert_eq!(synced.user_extracted_info, "每季度");
    assert_eq!(synced.user_disambiguation_result, "按\"季度\"进行分组");
    assert_eq!(synced.extracted_info, "每月，各大区");
}

#[test]
fn sync_is_refused_on_first_query_and_for_metric() {
    let (mut record, mut steps) = at_parameters();
    let mut cursor = QueryCursor::new();
    assert_eq!(
        cursor.sync_from_first(&mut record, ParameterKind::Sorting),
        Err(WizardError::SyncOnFirstQuery)
    );
    cursor.advance(&mut steps, &mut record);
    assert_eq!(
        cursor.sync_from_first(&mut record, ParameterKind::Metric),
        Err(WizardError::SyncNotOffered(ParameterKind::Metric))
    );
}

#[test]
fn correction_targets_current_query() {
    let (mut record, mut steps) = at_parameters();
    let mut cursor = QueryCursor::new();
    cursor.advance(&mut steps, &mut record);
    cursor
        .apply_correction(&mut record, &Correction::GroupBy(vec!["季度".to_string()]))
        .expect("apply");
    assert_eq!(
        judgment(&record, 1, ParameterKind::GroupBy).user_disambiguation_result,
        "按\"季度\"进行分组"
    );
    assert!(judgment(&record, 0, ParameterKind::GroupBy)
        .user_disambiguation_result
        .is_empty());
}

#[test]
fn stage_annotation_keeps_original_list() {
    let (mut record, mut steps) = at_parameters();
    let mut cursor = QueryCursor::new();
    cursor
        .annotate_intermediate_stage(
            &mut record,
            IntermediateStage::FilteredByGoldenRules,
            vec!["61535：总新签佣金".to_string()],
        )
        .expect("annotate");
    let metric = judgment(&record, 0, ParameterKind::Metric);
    let correction = metric
        .annotations
        .as_ref()
        .and_then(|annotations| annotations.get(IntermediateStage::FilteredByGoldenRules))
        .expect("stage annotation");
    assert_eq!(
        correction.original_value,
        vec!["61535：总新签佣金", "61538：新房认购套均佣金"]
    );
    assert_eq!(correction.annotated_value, vec!["61535：总新签佣金"]);
    assert!(metric.is_correct);

    cursor.advance(&mut steps, &mut record);
    cursor
        .annotate_intermediate_stage(&mut record, IntermediateStage::InitialMetrics, Vec::new())
        .expect("annotate without pipeline trace");
    let second = judgment(&record, 1, ParameterKind::Metric)
        .annotations
        .as_ref()
        .and_then(|annotations| annotations.get(IntermediateStage::InitialMetrics))
        .expect("stage annotation");
    assert!(second.original_value.is_empty());
}
