//! Typed correction shapes, one per parameter kind.
//!
//! Each shape owns the fixed template it serializes to, so a correction can
//! only produce text the downstream consumers already understand. Applying a
//! correction writes one correction field and never changes the verdict.
use crate::catalog::{Catalog, DimensionCatalog, MetricCatalog};
use crate::error::WizardError;
use crate::record::{ParameterJudgment, ParameterKind, UserField};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Label written to `userExtractedInfo` when the total toggle is on.
pub const CALCULATION_TOTAL_LABEL: &str = "合计";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Correction {
    Metric(MetricChoice),
    TimeRange(DateInterval),
    Constraints(Vec<Constraint>),
    GroupBy(Vec<String>),
    Sorting(SortSpec),
    Calculation(bool),
}

impl Correction {
    pub fn kind(&self) -> ParameterKind {
        match self {
            Correction::Metric(_) => ParameterKind::Metric,
            Correction::TimeRange(_) => ParameterKind::TimeRange,
            Correction::Constraints(_) => ParameterKind::Constraints,
            Correction::GroupBy(_) => ParameterKind::GroupBy,
            Correction::Sorting(_) => ParameterKind::Sorting,
            Correction::Calculation(_) => ParameterKind::Calculation,
        }
    }

    /// The correction field this shape fills.
    pub fn target_field(&self) -> UserField {
        match self {
            Correction::Calculation(_) => UserField::ExtractedInfo,
            _ => UserField::DisambiguationResult,
        }
    }

    /// Reject shapes that serde alone cannot rule out.
    pub fn validate(&self) -> Result<(), WizardError> {
        let kind = self.kind();
        match self {
            Correction::Metric(choice) => {
                if choice.id.trim().is_empty() || choice.name.trim().is_empty() {
                    return Err(WizardError::invalid(kind, "metric needs an id and a name"));
                }
            }
            Correction::TimeRange(interval) => {
                if interval.end < interval.start {
                    return Err(WizardError::invalid(
                        kind,
                        format!("end {} precedes start {}", interval.end, interval.start),
                    ));
                }
            }
            Correction::Constraints(clauses) => {
                if clauses.is_empty() {
                    return Err(WizardError::invalid(kind, "at least one constraint is required"));
                }
                if clauses.iter().any(|clause| clause.dimension.trim().is_empty()) {
                    return Err(WizardError::invalid(kind, "every constraint needs a dimension"));
                }
            }
            Correction::GroupBy(dimensions) => {
                if dimensions.is_empty() || dimensions.iter().any(|dim| dim.trim().is_empty()) {
                    return Err(WizardError::invalid(
                        kind,
                        "group-by needs one or more named dimensions",
                    ));
                }
            }
            Correction::Sorting(_) | Correction::Calculation(_) => {}
        }
        Ok(())
    }

    /// Reject constraint and group-by dimensions missing from `dimensions`.
    pub fn check_dimensions(&self, dimensions: &DimensionCatalog) -> Result<(), WizardError> {
        let named: Vec<&str> = match self {
            Correction::Constraints(clauses) => clauses
                .iter()
                .map(|clause| clause.dimension.as_str())
                .collect(),
            Correction::GroupBy(names) => names.iter().map(String::as_str).collect(),
            _ => return Ok(()),
        };
        if dimensions.names().is_empty() {
            return Ok(());
        }
        match named.into_iter().find(|name| !dimensions.contains(name)) {
            Some(unknown) => Err(WizardError::invalid(
                self.kind(),
                format!(
                    "unknown dimension {unknown:?} (known: {})",
                    dimensions.names().join(", ")
                ),
            )),
            None => Ok(()),
        }
    }

    /// Serialized text in the kind's fixed template.
    pub fn render(&self) -> String {
        match self {
            Correction::Metric(choice) => choice.to_string(),
            Correction::TimeRange(interval) => interval.to_string(),
            Correction::Constraints(clauses) => clauses
                .iter()
                .map(Constraint::to_string)
                .collect::<Vec<_>>()
                .join("; "),
            Correction::GroupBy(dimensions) => format!("按\"{}\"进行分组", dimensions.join("\",\"")),
            Correction::Sorting(spec) => spec.to_string(),
            Correction::Calculation(total) => {
                if *total {
                    CALCULATION_TOTAL_LABEL.to_string()
                } else {
                    String::new()
                }
            }
        }
    }

    pub fn apply(&self, judgment: &mut ParameterJudgment) -> Result<(), WizardError> {
        self.validate()?;
        judgment.set_user_field(self.target_field(), self.render());
        Ok(())
    }

    /// Parse reviewer shorthand for `kind`.
    ///
    /// Metric accepts a catalog id or `id：name`; time range two ISO dates;
    /// constraints `dim in a,b; dim not in c`; group-by a comma list; sorting
    /// `desc top 3`; calculation `on`/`off`.
    pub fn parse(
        kind: ParameterKind,
        text: &str,
        catalog: &Catalog,
    ) -> Result<Correction, WizardError> {
        let text = text.trim();
        if text.is_empty() && kind != ParameterKind::Calculation {
            return Err(WizardError::invalid(kind, "missing value"));
        }
        let correction = match kind {
            ParameterKind::Metric => Correction::Metric(MetricChoice::parse(text, &catalog.metrics)?),
            ParameterKind::TimeRange => Correction::TimeRange(DateInterval::parse(text)?),
            ParameterKind::Constraints => Correction::Constraints(parse_constraints(text)?),
            ParameterKind::GroupBy => Correction::GroupBy(split_list(text)),
            ParameterKind::Sorting => Correction::Sorting(SortSpec::parse(text)?),
            ParameterKind::Calculation => Correction::Calculation(parse_toggle(text)?),
        };
        correction.validate()?;
        correction.check_dimensions(&catalog.dimensions)?;
        Ok(correction)
    }
}

/// A catalog metric picked by the reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetricChoice {
    pub id: String,
    pub name: String,
}

impl MetricChoice {
    fn parse(text: &str, catalog: &MetricCatalog) -> Result<MetricChoice, WizardError> {
        if let Some((id, name)) = text.split_once(['：', ':']) {
            return Ok(MetricChoice {
                id: id.trim().to_string(),
                name: name.trim().to_string(),
            });
        }
        catalog
            .find_by_id(text)
            .map(|entry| MetricChoice {
                id: entry.id.clone(),
                name: entry.name.clone(),
            })
            .ok_or_else(|| {
                WizardError::invalid(ParameterKind::Metric, format!("no catalog metric {text:?}"))
            })
    }
}

impl fmt::Display for MetricChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}：{}", self.id, self.name)
    }
}

/// Closed date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<DateInterval, WizardError> {
        let interval = DateInterval { start, end };
        Correction::TimeRange(interval).validate()?;
        Ok(interval)
    }

    fn parse(text: &str) -> Result<DateInterval, WizardError> {
        let date = Regex::new(r"\d{4}-\d{2}-\d{2}").expect("regex for ISO dates");
        let dates = date
            .find_iter(text)
            .map(|found| {
                NaiveDate::parse_from_str(found.as_str(), DATE_FORMAT).map_err(|err| {
                    WizardError::invalid(
                        ParameterKind::TimeRange,
                        format!("bad date {:?}: {err}", found.as_str()),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        match dates.as_slice() {
            [start, end] => DateInterval::new(*start, *end),
            _ => Err(WizardError::invalid(
                ParameterKind::TimeRange,
                format!("expected two YYYY-MM-DD dates, found {}", dates.len()),
            )),
        }
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "between {} and {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ConstraintOperator {
    #[default]
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
}

impl ConstraintOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintOperator::In => "in",
            ConstraintOperator::NotIn => "not in",
        }
    }
}

/// One `(dimension, operator, values)` clause; values stay comma-separated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Constraint {
    pub dimension: String,
    #[serde(default)]
    pub operator: ConstraintOperator,
    pub values: String,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.dimension,
            self.operator.as_str(),
            self.values
        )
    }
}

fn parse_constraints(text: &str) -> Result<Vec<Constraint>, WizardError> {
    let clause_re = Regex::new(r"^(?P<dim>\S+)\s+(?P<op>not\s+in|in)\s+\(?(?P<values>.*?)\)?$")
        .expect("regex for constraint clauses");
    text.split([';', '；'])
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(|clause| {
            let caps = clause_re.captures(clause).ok_or_else(|| {
                WizardError::invalid(
                    ParameterKind::Constraints,
                    format!("expected `<dimension> in|not in <values>`, got {clause:?}"),
                )
            })?;
            let operator = if caps["op"].starts_with("not") {
                ConstraintOperator::NotIn
            } else {
                ConstraintOperator::In
            };
            Ok(Constraint {
                dimension: caps["dim"].to_string(),
                operator,
                values: caps["values"].trim().to_string(),
            })
        })
        .collect()
}

fn split_list(text: &str) -> Vec<String> {
    text.split([',', '，'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_toggle(text: &str) -> Result<bool, WizardError> {
    match text.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" | CALCULATION_TOTAL_LABEL => Ok(true),
        "off" | "false" | "no" | "0" | "" => Ok(false),
        other => Err(WizardError::invalid(
            ParameterKind::Calculation,
            format!("expected on/off, got {other:?}"),
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
    Top,
    Bottom,
}

/// Order direction, top/bottom selection, and a positive row limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SortSpec {
    pub order: SortOrder,
    pub rank: RankDirection,
    pub limit: NonZeroU32,
}

impl SortSpec {
    fn parse(text: &str) -> Result<SortSpec, WizardError> {
        let spec = Regex::new(
            r"(?i)^(?P<order>asc|desc|升序|降序)[,，\s]+(?P<rank>top|bottom)\s*(?P<limit>\d+)$",
        )
        .expect("regex for sorting specs");
        let caps = spec.captures(text).ok_or_else(|| {
            WizardError::invalid(
                ParameterKind::Sorting,
                format!("expected `asc|desc top|bottom <limit>`, got {text:?}"),
            )
        })?;
        let order = match caps["order"].to_ascii_lowercase().as_str() {
            "asc" | "升序" => SortOrder::Asc,
            _ => SortOrder::Desc,
        };
        let rank = if caps["rank"].eq_ignore_ascii_case("bottom") {
            RankDirection::Bottom
        } else {
            RankDirection::Top
        };
        let limit = caps["limit"]
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                WizardError::invalid(ParameterKind::Sorting, "limit must be an integer >= 1")
            })?;
        Ok(SortSpec { order, rank, limit })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.order {
            SortOrder::Asc => "升序",
            SortOrder::Desc => "降序",
        };
        let rank = match self.rank {
            RankDirection::Top => "top",
            RankDirection::Bottom => "bottom",
        };
        write!(f, "{order}, {rank} {}", self.limit)
    }
}

#[cfg(test)]
#[path = "corrections_tests.rs"]
mod tests;
