//! Parameter judgments keyed by the six fixed slot kinds.
use super::{IntermediateAnnotations, IntermediateResults};
use crate::error::WizardError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Slot categories extracted per sub-query, in review order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterKind {
    Metric,
    TimeRange,
    Constraints,
    GroupBy,
    Sorting,
    Calculation,
}

impl ParameterKind {
    pub const ALL: [ParameterKind; 6] = [
        ParameterKind::Metric,
        ParameterKind::TimeRange,
        ParameterKind::Constraints,
        ParameterKind::GroupBy,
        ParameterKind::Sorting,
        ParameterKind::Calculation,
    ];

    /// Return the stable string identifier used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::Metric => "metric",
            ParameterKind::TimeRange => "timeRange",
            ParameterKind::Constraints => "constraints",
            ParameterKind::GroupBy => "groupBy",
            ParameterKind::Sorting => "sorting",
            ParameterKind::Calculation => "calculation",
        }
    }

    /// Reviewer-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            ParameterKind::Metric => "指标",
            ParameterKind::TimeRange => "时间范围",
            ParameterKind::Constraints => "约束条件",
            ParameterKind::GroupBy => "分组条件",
            ParameterKind::Sorting => "排序条件",
            ParameterKind::Calculation => "计算方式",
        }
    }

    /// Calculation is a single toggle and has no disambiguation output.
    pub fn requires_disambiguation(&self) -> bool {
        *self != ParameterKind::Calculation
    }

    /// Metrics legitimately differ between sibling sub-queries.
    pub fn syncable(&self) -> bool {
        *self != ParameterKind::Metric
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterKind {
    type Err = WizardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| *ch != '_' && *ch != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        ParameterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| WizardError::unknown("parameter kind", value))
    }
}

/// Reviewer-editable correction fields of a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UserField {
    ExtractedInfo,
    DisambiguationResult,
}

impl UserField {
    /// Return the record field name this variant writes.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserField::ExtractedInfo => "userExtractedInfo",
            UserField::DisambiguationResult => "userDisambiguationResult",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System output for one slot plus the reviewer's verdict and corrections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterJudgment {
    pub extracted_info: String,
    #[serde(default)]
    pub disambiguation_result: String,
    #[serde(default = "super::default_true")]
    pub is_correct: bool,
    #[serde(default)]
    pub user_extracted_info: String,
    #[serde(default)]
    pub user_disambiguation_result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate_results: Option<IntermediateResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<IntermediateAnnotations>,
}

impl ParameterJudgment {
    /// Build an unreviewed judgment from pipeline output.
    pub fn from_system(extracted_info: &str, disambiguation_result: &str) -> Self {
        Self {
            extracted_info: extracted_info.to_string(),
            disambiguation_result: disambiguation_result.to_string(),
            is_correct: true,
            user_extracted_info: String::new(),
            user_disambiguation_result: String::new(),
            intermediate_results: None,
            annotations: None,
        }
    }

    /// Set the verdict; a correct verdict clears both correction fields.
    pub fn set_correct(&mut self, is_correct: bool) {
        self.is_correct = is_correct;
        if is_correct {
            self.user_extracted_info.clear();
            self.user_disambiguation_result.clear();
        }
    }

    pub fn user_field(&self, field: UserField) -> &str {
        match field {
            UserField::ExtractedInfo => &self.user_extracted_info,
            UserField::DisambiguationResult => &self.user_disambiguation_result,
        }
    }

    pub fn set_user_field(&mut self, field: UserField, value: impl Into<String>) {
        let value = value.into();
        match field {
            UserField::ExtractedInfo => self.user_extracted_info = value,
            UserField::DisambiguationResult => self.user_disambiguation_result = value,
        }
    }

    /// Copy the verdict and both correction fields from a sibling judgment.
    ///
    /// System output, intermediate results, and stage annotations stay put.
    pub fn copy_verdict_from(&mut self, other: &ParameterJudgment) {
        self.is_correct = other.is_correct;
        self.user_extracted_info = other.user_extracted_info.clone();
        self.user_disambiguation_result = other.user_disambiguation_result.clone();
    }

    /// Disambiguation text as shown to reviewers.
    pub fn display_disambiguation(&self) -> Cow<'_, str> {
        // Upstream templates emit 分许 for 分组.
        if self.disambiguation_result.contains("分许") {
            Cow::Owned(self.disambiguation_result.replace("分许", "分组"))
        } else {
            Cow::Borrowed(&self.disambiguation_result)
        }
    }
}

/// Exactly one judgment per kind; a missing or duplicated kind fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParameterSet {
    pub metric: ParameterJudgment,
    pub time_range: ParameterJudgment,
    pub constraints: ParameterJudgment,
    pub group_by: ParameterJudgment,
    pub sorting: ParameterJudgment,
    pub calculation: ParameterJudgment,
}

impl ParameterSet {
    pub fn get(&self, kind: ParameterKind) -> &ParameterJudgment {
        match kind {
            ParameterKind::Metric => &self.metric,
            ParameterKind::TimeRange => &self.time_range,
            ParameterKind::Constraints => &self.constraints,
            ParameterKind::GroupBy => &self.group_by,
            ParameterKind::Sorting => &self.sorting,
            ParameterKind::Calculation => &self.calculation,
        }
    }

    pub fn get_mut(&mut self, kind: ParameterKind) -> &mut ParameterJudgment {
        match kind {
            ParameterKind::Metric => &mut self.metric,
            ParameterKind::TimeRange => &mut self.time_range,
            ParameterKind::Constraints => &mut self.constraints,
            ParameterKind::GroupBy => &mut self.group_by,
            ParameterKind::Sorting => &mut self.sorting,
            ParameterKind::Calculation => &mut self.calculation,
        }
    }

    /// Iterate judgments in review order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKind, &ParameterJudgment)> + '_ {
        ParameterKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.get(kind)))
    }
}
