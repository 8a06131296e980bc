//! Plain-text rendering of the current review screen.
use crate::record::{IntermediateStage, ParameterJudgment, QueryAnnotation, UserChoice};
use crate::session::Session;
use crate::steps::{Step, StepController};

/// Display switches that do not affect the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenOptions {
    pub show_disambiguation: bool,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            show_disambiguation: true,
        }
    }
}

pub fn render_screen(session: &Session, options: ScreenOptions) -> String {
    let step = session.step();
    let mut out = format!(
        "== 第 {}/{} 步：{} ==\n",
        step.index() + 1,
        StepController::TOTAL_STEPS,
        step.label()
    );
    let record = session.record();
    match step {
        Step::ContextIntegration => render_context(&mut out, session),
        Step::QueryDecomposition => render_decomposition(&mut out, session),
        Step::ParameterExtraction => {
            out.push_str(&format!(
                "当前标注第 {} 个查询，共 {} 个\n",
                session.query_index() + 1,
                record.parameter_extractions.len()
            ));
            if let Some(query) = record.parameter_extractions.get(session.query_index()) {
                render_query(&mut out, query, session.query_index(), options);
            }
            let dimensions = session.catalog().dimensions.names();
            if !dimensions.is_empty() {
                out.push_str(&format!("\n可选维度：{}\n", dimensions.join("，")));
            }
        }
    }
    if session.is_completed() {
        out.push_str("\n标注已完成。\n");
    } else {
        let status = session.status();
        out.push_str(&format!("\n[{}] {}\n", gate_marker(status.can_advance), status.next_action));
    }
    out
}

fn gate_marker(can_advance: bool) -> &'static str {
    if can_advance {
        "ready"
    } else {
        "blocked"
    }
}

fn render_context(out: &mut String, session: &Session) {
    let context = &session.record().context_integration;
    out.push_str(&format!("原始查询：{}\n", context.original_query));
    out.push_str(&format!("追问查询：{}\n", context.follow_up_query));
    out.push_str(&format!("系统整合：{}\n\n", context.system_integration));
    for option in UserChoice::OPTIONS {
        let mark = if context.user_choice == option { "x" } else { " " };
        out.push_str(&format!("  [{mark}] {}\n", option.label()));
    }
    if session.wants_suggestion() {
        out.push_str(&format!("建议整合：{}\n", context.user_suggestion));
    }
}

fn render_decomposition(out: &mut String, session: &Session) {
    let decomposition = &session.record().query_decomposition;
    out.push_str(&format!("整合后查询：{}\n", decomposition.original_query));
    out.push_str("系统拆解：\n");
    for (index, query) in decomposition.decomposed_queries.iter().enumerate() {
        out.push_str(&format!("  {}. {query}\n", index + 1));
    }
    let verdict = if decomposition.is_correct {
        "正确"
    } else {
        "错误"
    };
    out.push_str(&format!("拆解判断：{verdict}\n"));
    if session.wants_custom_queries() {
        out.push_str("用户拆解：\n");
        if decomposition.user_decomposition.is_empty() {
            out.push_str("  (空)\n");
        }
        for (index, query) in decomposition.user_decomposition.iter().enumerate() {
            out.push_str(&format!("  {}. {query}\n", index + 1));
        }
    }
}

fn render_query(out: &mut String, query: &QueryAnnotation, index: usize, options: ScreenOptions) {
    out.push_str(&format!("查询：{}\n", query.query));
    for (kind, judgment) in query.parameters.iter() {
        let verdict = if judgment.is_correct { "✓" } else { "✗" };
        out.push_str(&format!(
            "\n{verdict} {}（{kind}）：{}\n",
            kind.label(),
            judgment.extracted_info
        ));
        if options.show_disambiguation && kind.requires_disambiguation() {
            out.push_str(&format!("    消歧结果：{}\n", judgment.display_disambiguation()));
        }
        if !judgment.is_correct {
            out.push_str(&format!("    更正提取：{}\n", judgment.user_extracted_info));
            if kind.requires_disambiguation() {
                out.push_str(&format!(
                    "    更正消歧：{}\n",
                    judgment.user_disambiguation_result
                ));
            }
        }
        if index > 0 && kind.syncable() {
            out.push_str(&format!("    (sync {kind} 可同步第 1 个查询的标注)\n"));
        }
        render_stages(out, judgment);
    }
}

fn render_stages(out: &mut String, judgment: &ParameterJudgment) {
    let Some(results) = judgment.intermediate_results.as_ref() else {
        return;
    };
    out.push_str("    中间结果：\n");
    for stage in IntermediateStage::DISPLAY_ORDER {
        out.push_str(&format!(
            "      {}（{stage}）：{}\n",
            stage.label(),
            join_or_dash(results.get(stage))
        ));
        let annotated = judgment
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(stage));
        if let Some(correction) = annotated {
            out.push_str(&format!(
                "        标注：{}\n",
                join_or_dash(&correction.annotated_value)
            ));
        }
    }
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join("，")
    }
}
