use super::{
    Constraint, ConstraintOperator, Correction, DateInterval, MetricChoice, RankDirection,
    SortOrder, SortSpec, CALCULATION_TOTAL_LABEL,
};
use crate::catalog::{default_dimensions, Catalog, DimensionCatalog};
use crate::config::ReviewConfig;
use crate::error::WizardError;
use crate::record::{ParameterJudgment, ParameterKind, UserField};
use chrono::NaiveDate;
use std::num::NonZeroU32;

fn catalog() -> Catalog {
    ReviewConfig::default().catalog()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn metric_renders_id_and_name_with_fullwidth_colon() {
    let correction = Correction::parse(ParameterKind::Metric, "61536", &catalog())
        .expect("catalog id resolves");
    assert_eq!(correction.render(), "61536：总新签单量");

    let explicit = Correction::parse(ParameterKind::Metric, "70001:自定义指标", &catalog())
        .expect("explicit id and name");
    assert_eq!(
        explicit,
        Correction::Metric(MetricChoice {
            id: "70001".to_string(),
            name: "自定义指标".to_string(),
        })
    );
}

#[test]
fn unknown_metric_id_is_rejected() {
    let err = Correction::parse(ParameterKind::Metric, "99999", &catalog())
        .expect_err("not in catalog");
    assert!(matches!(
        err,
        WizardError::InvalidCorrection {
            kind: ParameterKind::Metric,
            ..
        }
    ));
}

#[test]
fn time_range_renders_between_template() {
    let correction = Correction::parse(
        ParameterKind::TimeRange,
        "2024-01-01 ~ 2024-03-31",
        &catalog(),
    )
    .expect("two dates");
    assert_eq!(correction.render(), "between 2024-01-01 and 2024-03-31");
}

#[test]
fn time_range_rejects_reversed_or_partial_input() {
    assert!(DateInterval::new(date(2024, 3, 1), date(2024, 1, 1)).is_err());
    assert!(DateInterval::new(date(2024, 3, 1), date(2024, 3, 1)).is_ok());
    assert!(Correction::parse(ParameterKind::TimeRange, "2024-01-01", &catalog()).is_err());
    assert!(
        Correction::parse(ParameterKind::TimeRange, "2024-02-30 2024-03-01", &catalog()).is_err()
    );
}

#[test]
fn constraints_render_each_clause() {
    let correction = Correction::parse(
        ParameterKind::Constraints,
        "业绩城市 in (武汉)；子品牌 not in 德佑,KA",
        &catalog(),
    )
    .expect("two clauses");
    assert_eq!(
        correction,
        Correction::Constraints(vec![
            Constraint {
                dimension: "业绩城市".to_string(),
                operator: ConstraintOperator::In,
                values: "武汉".to_string(),
            },
            Constraint {
                dimension: "子品牌".to_string(),
                operator: ConstraintOperator::NotIn,
                values: "德佑,KA".to_string(),
            },
        ])
    );
    assert_eq!(
        correction.render(),
        "业绩城市 in (武汉); 子品牌 not in (德佑,KA)"
    );
}

#[test]
fn malformed_constraint_names_the_clause() {
    let err = Correction::parse(ParameterKind::Constraints, "武汉", &catalog())
        .expect_err("no operator");
    assert!(err.to_string().contains("武汉"));
}

#[test]
fn group_by_renders_quoted_dimensions() {
    let correction =
        Correction::parse(ParameterKind::GroupBy, "月份，大区", &catalog()).expect("list");
    assert_eq!(correction.render(), "按\"月份\",\"大区\"进行分组");
    assert!(Correction::GroupBy(Vec::new()).validate().is_err());
}

#[test]
fn sorting_parses_order_rank_and_limit() {
    let correction =
        Correction::parse(ParameterKind::Sorting, "asc bottom 5", &catalog()).expect("sorting");
    assert_eq!(
        correction,
        Correction::Sorting(SortSpec {
            order: SortOrder::Asc,
            rank: RankDirection::Bottom,
            limit: NonZeroU32::new(5).expect("non-zero"),
        })
    );
    assert_eq!(correction.render(), "升序, bottom 5");
    let top_three = SortSpec {
        order: SortOrder::Desc,
        rank: RankDirection::Top,
        limit: NonZeroU32::new(3).expect("non-zero"),
    };
    assert_eq!(top_three.to_string(), "降序, top 3");
    assert!(Correction::parse(ParameterKind::Sorting, "desc top 0", &catalog()).is_err());
}

#[test]
fn calculation_toggle_writes_extracted_info() {
    let on = Correction::parse(ParameterKind::Calculation, "on", &catalog()).expect("on");
    assert_eq!(on.target_field(), UserField::ExtractedInfo);
    assert_eq!(on.render(), CALCULATION_TOTAL_LABEL);
    let off = Correction::parse(ParameterKind::Calculation, "", &catalog()).expect("blank is off");
    assert_eq!(off.render(), "");
}

#[test]
fn apply_fills_one_field_and_keeps_verdict() {
    let mut judgment = ParameterJudgment::from_system("今年", "between 2024Ys and 0d");
    judgment.set_correct(false);
    let correction = Correction::TimeRange(
        DateInterval::new(date(2024, 1, 1), date(2024, 6, 30)).expect("ordered"),
    );
    correction.apply(&mut judgment).expect("apply");
    assert!(!judgment.is_correct);
    assert_eq!(
        judgment.user_disambiguation_result,
        "between 2024-01-01 and 2024-06-30"
    );
    assert!(judgment.user_extracted_info.is_empty());
}

#[test]
fn corrections_deserialize_from_tagged_json() {
    let value = serde_json::json!({
        "kind": "constraints",
        "value": [{ "dimension": "大区", "values": "华北" }]
    });
    let correction: Correction = serde_json::from_value(value).expect("parse correction");
    assert_eq!(correction.kind(), ParameterKind::Constraints);
    assert_eq!(correction.render(), "大区 in (华北)");
}

#[test]
fn constraint_and_group_by_dimensions_must_be_known() {
    let err = Correction::parse(ParameterKind::Constraints, "城市 in 武汉", &catalog())
        .expect_err("城市 is not a catalog dimension");
    assert!(err.to_string().contains("unknown dimension \"城市\""), "{err}");
    assert!(Correction::parse(ParameterKind::GroupBy, "月份,周", &catalog()).is_err());

    let narrow = DimensionCatalog::new(vec!["大区".to_string()]);
    assert!(Correction::GroupBy(vec!["大区".to_string()])
        .check_dimensions(&narrow)
        .is_ok());
    assert!(Correction::GroupBy(vec!["月份".to_string()])
        .check_dimensions(&narrow)
        .is_err());
    assert!(Correction::Calculation(true)
        .check_dimensions(&DimensionCatalog::new(default_dimensions()))
        .is_ok());
    assert!(Correction::GroupBy(vec!["城市".to_string()])
        .check_dimensions(&DimensionCatalog::default())
        .is_ok());
}
