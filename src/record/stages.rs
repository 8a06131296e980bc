//! Metric disambiguation pipeline stages and reviewer corrections to them.
use crate::error::WizardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named candidate lists produced while disambiguating a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IntermediateStage {
    InitialMetrics,
    FilteredByGoldenRules,
    FilteredByDimensions,
    FilteredByExactMatch,
    DisambiguationSteps,
}

impl IntermediateStage {
    /// Pipeline order: recall, rule filter, dimension filter, exact match, trace.
    pub const ALL: [IntermediateStage; 5] = [
        IntermediateStage::InitialMetrics,
        IntermediateStage::FilteredByGoldenRules,
        IntermediateStage::FilteredByDimensions,
        IntermediateStage::FilteredByExactMatch,
        IntermediateStage::DisambiguationSteps,
    ];

    /// Order used on the review screen.
    pub const DISPLAY_ORDER: [IntermediateStage; 5] = [
        IntermediateStage::FilteredByGoldenRules,
        IntermediateStage::FilteredByDimensions,
        IntermediateStage::InitialMetrics,
        IntermediateStage::FilteredByExactMatch,
        IntermediateStage::DisambiguationSteps,
    ];

    /// Return the stable string identifier used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntermediateStage::InitialMetrics => "initialMetrics",
            IntermediateStage::FilteredByGoldenRules => "filteredByGoldenRules",
            IntermediateStage::FilteredByDimensions => "filteredByDimensions",
            IntermediateStage::FilteredByExactMatch => "filteredByExactMatch",
            IntermediateStage::DisambiguationSteps => "disambiguationSteps",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IntermediateStage::InitialMetrics => "召回指标列表",
            IntermediateStage::FilteredByGoldenRules => "黄金规则过滤指标列表",
            IntermediateStage::FilteredByDimensions => "维度高置信组合过滤指标列表",
            IntermediateStage::FilteredByExactMatch => "完全匹配指标列表",
            IntermediateStage::DisambiguationSteps => "策略消歧中间结果",
        }
    }
}

impl fmt::Display for IntermediateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntermediateStage {
    type Err = WizardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().replace('_', "").to_ascii_lowercase();
        IntermediateStage::ALL
            .into_iter()
            .find(|stage| stage.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| WizardError::unknown("intermediate stage", value))
    }
}

/// Read-only stage outputs supplied by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntermediateResults {
    #[serde(default)]
    pub initial_metrics: Vec<String>,
    #[serde(default)]
    pub filtered_by_golden_rules: Vec<String>,
    #[serde(default)]
    pub filtered_by_dimensions: Vec<String>,
    #[serde(default)]
    pub filtered_by_exact_match: Vec<String>,
    #[serde(default)]
    pub disambiguation_steps: Vec<String>,
}

impl IntermediateResults {
    pub fn get(&self, stage: IntermediateStage) -> &[String] {
        match stage {
            IntermediateStage::InitialMetrics => &self.initial_metrics,
            IntermediateStage::FilteredByGoldenRules => &self.filtered_by_golden_rules,
            IntermediateStage::FilteredByDimensions => &self.filtered_by_dimensions,
            IntermediateStage::FilteredByExactMatch => &self.filtered_by_exact_match,
            IntermediateStage::DisambiguationSteps => &self.disambiguation_steps,
        }
    }
}

/// A reviewer edit of one stage: the untouched original next to the fix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCorrection {
    pub original_value: Vec<String>,
    pub annotated_value: Vec<String>,
}

impl StageCorrection {
    /// Split comma-separated reviewer input into trimmed, non-empty values.
    pub fn values_from_text(text: &str) -> Vec<String> {
        text.split([',', '，'])
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Stage corrections, present only for stages a reviewer edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntermediateAnnotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_metrics: Option<StageCorrection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_by_golden_rules: Option<StageCorrection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_by_dimensions: Option<StageCorrection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_by_exact_match: Option<StageCorrection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguation_steps: Option<StageCorrection>,
}

impl IntermediateAnnotations {
    pub fn get(&self, stage: IntermediateStage) -> Option<&StageCorrection> {
        self.slot(stage).as_ref()
    }

    pub fn set(&mut self, stage: IntermediateStage, correction: StageCorrection) {
        *self.slot_mut(stage) = Some(correction);
    }

    pub fn is_empty(&self) -> bool {
        IntermediateStage::ALL
            .into_iter()
            .all(|stage| self.get(stage).is_none())
    }

    fn slot(&self, stage: IntermediateStage) -> &Option<StageCorrection> {
        match stage {
            IntermediateStage::InitialMetrics => &self.initial_metrics,
            IntermediateStage::FilteredByGoldenRules => &self.filtered_by_golden_rules,
            IntermediateStage::FilteredByDimensions => &self.filtered_by_dimensions,
            IntermediateStage::FilteredByExactMatch => &self.filtered_by_exact_match,
            IntermediateStage::DisambiguationSteps => &self.disambiguation_steps,
        }
    }

    fn slot_mut(&mut self, stage: IntermediateStage) -> &mut Option<StageCorrection> {
        match stage {
            IntermediateStage::InitialMetrics => &mut self.initial_metrics,
            IntermediateStage::FilteredByGoldenRules => &mut self.filtered_by_golden_rules,
            IntermediateStage::FilteredByDimensions => &mut self.filtered_by_dimensions,
            IntermediateStage::FilteredByExactMatch => &mut self.filtered_by_exact_match,
            IntermediateStage::DisambiguationSteps => &mut self.disambiguation_steps,
        }
    }
}
