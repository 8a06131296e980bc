//! Built-in demo session: a follow-up query about 武汉 after one about 天津,
//! decomposed into three single-metric sub-queries.
use crate::record::{
    AnnotationRecord, ContextIntegration, IntermediateResults, ParameterJudgment, ParameterSet,
    QueryAnnotation, QueryDecomposition, UserChoice,
};

const INTEGRATED_QUERY: &str = "业绩城市为武汉，各大区今年每月德佑、KA合计二手佣金、单量、GTV是多少？";
const CONSTRAINTS_EXTRACTED: &str = "\"业绩城市:武汉\",\"二手\",\"德佑\",\"KA\"";
const CONSTRAINTS_RESOLVED: &str = "业绩城市performance_city_name in (\"武汉\")；子品牌sub_brand_name in （\"德佑\",\"KA\"）;业务类型del_type_name in (\"二手\")";
const GROUP_BY_RESOLVED: &str = "按\"月：month\"，\"大区：area_name\"进行分许";

struct SubQuery {
    query: &'static str,
    metric: &'static str,
    metric_resolved: &'static str,
    sorting: Option<(&'static str, &'static str)>,
}

const SUB_QUERIES: [SubQuery; 3] = [
    SubQuery {
        query: "业绩城市为武汉，各大区今年每月德佑、KA合计\"二手佣金\"是多少，按佣金降序取前3？",
        metric: "佣金",
        metric_resolved: "61535：总新签佣金",
        sorting: Some(("排序指标：佣金，降序，取top3", "排序指标：\"新签佣金\"，降序，top3")),
    },
    SubQuery {
        query: "业绩城市为武汉，各大区今年每月德佑、KA合计\"二手单量\"是多少？",
        metric: "单量",
        metric_resolved: "61536：总新签单量",
        sorting: None,
    },
    SubQuery {
        query: "业绩城市为武汉，各大区今年每月德佑、KA合计\"二手GTV\"是多少？",
        metric: "GTV",
        metric_resolved: "61537：总新签GTV",
        sorting: None,
    },
];

/// The demo record, unreviewed.
pub fn sample_record() -> AnnotationRecord {
    AnnotationRecord {
        context_integration: ContextIntegration {
            original_query:
                "业绩城市为天津，各大区今年每月德佑、KA合计二手佣金、单量、GTV是多少？按佣金降序取前3"
                    .to_string(),
            follow_up_query: "武汉的呢？".to_string(),
            system_integration: INTEGRATED_QUERY.to_string(),
            user_choice: UserChoice::Unset,
            user_suggestion: String::new(),
        },
        query_decomposition: QueryDecomposition {
            original_query: INTEGRATED_QUERY.to_string(),
            decomposed_queries: SUB_QUERIES
                .iter()
                .map(|sub| sub.query.to_string())
                .collect(),
            is_correct: true,
            user_decomposition: Vec::new(),
        },
        parameter_extractions: SUB_QUERIES
            .iter()
            .enumerate()
            .map(|(index, sub)| sub_query_annotation(index, sub))
            .collect(),
        completed: false,
    }
}

fn sub_query_annotation(index: usize, sub: &SubQuery) -> QueryAnnotation {
    let mut metric = ParameterJudgment::from_system(sub.metric, sub.metric_resolved);
    if index == 0 {
        metric.intermediate_results = Some(commission_pipeline_trace());
    }
    let (sorting_extracted, sorting_resolved) = sub.sorting.unwrap_or(("", ""));
    QueryAnnotation {
        query: sub.query.to_string(),
        parameters: ParameterSet {
            metric,
            time_range: ParameterJudgment::from_system("今年", "between 2024Ys and 0d"),
            constraints: ParameterJudgment::from_system(
                CONSTRAINTS_EXTRACTED,
                CONSTRAINTS_RESOLVED,
            ),
            group_by: ParameterJudgment::from_system("每月，各大区", GROUP_BY_RESOLVED),
            sorting: ParameterJudgment::from_system(sorting_extracted, sorting_resolved),
            calculation: ParameterJudgment::from_system("合计", ""),
        },
    }
}

fn commission_pipeline_trace() -> IntermediateResults {
    let list = |items: &[&str]| items.iter().map(|item| item.to_string()).collect();
    IntermediateResults {
        initial_metrics: list(&[
            "61535：总新签佣金",
            "61538：新房认购套均佣金",
            "61539：应收佣金打折率",
        ]),
        filtered_by_golden_rules: list(&["61535：总新签佣金", "61538：新房认购套均佣金"]),
        filtered_by_dimensions: list(&["61535：总新签佣金"]),
        filtered_by_exact_match: Vec::new(),
        disambiguation_steps: list(&["二手业务类型排除新房指标", "保留总新签佣金"]),
    }
}
