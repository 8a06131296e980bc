//! Reviewer intents and the line-command grammar that produces them.
//!
//! Intents are the only way a driver mutates a session. They serialize as
//! tagged JSON so scripted reviews can be replayed line by line.
use crate::catalog::Catalog;
use crate::corrections::Correction;
use crate::error::WizardError;
use crate::record::{IntermediateStage, ParameterKind, StageCorrection, UserChoice, UserField};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    SelectChoice {
        choice: UserChoice,
    },
    SetSuggestion {
        text: String,
    },
    SetDecompositionCorrect {
        is_correct: bool,
    },
    AddCustomQuery {
        text: String,
    },
    RemoveCustomQuery {
        index: usize,
    },
    SetJudgment {
        kind: ParameterKind,
        is_correct: bool,
    },
    SetUserField {
        kind: ParameterKind,
        field: UserField,
        value: String,
    },
    ApplyCorrection {
        correction: Correction,
    },
    SyncFromFirst {
        kind: ParameterKind,
    },
    AnnotateStage {
        stage: IntermediateStage,
        values: Vec<String>,
    },
    Next,
    Back,
}

impl Intent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SelectChoice { .. } => "select_choice",
            Intent::SetSuggestion { .. } => "set_suggestion",
            Intent::SetDecompositionCorrect { .. } => "set_decomposition_correct",
            Intent::AddCustomQuery { .. } => "add_custom_query",
            Intent::RemoveCustomQuery { .. } => "remove_custom_query",
            Intent::SetJudgment { .. } => "set_judgment",
            Intent::SetUserField { .. } => "set_user_field",
            Intent::ApplyCorrection { .. } => "apply_correction",
            Intent::SyncFromFirst { .. } => "sync_from_first",
            Intent::AnnotateStage { .. } => "annotate_stage",
            Intent::Next => "next",
            Intent::Back => "back",
        }
    }
}

/// A parsed interactive command: either an intent or a driver-local action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Status,
    Show,
    Search(String),
    Dimensions,
    Help,
    Quit,
}

pub const COMMAND_HELP: &str = "\
Commands:
  choice accept|reject|replace        context integration verdict (also a|b|c)
  suggest <text>                      corrected integration for `replace`
  decomp correct|incorrect            decomposition verdict
  add <query>                         append a custom sub-query
  remove <n>                          drop custom sub-query n (1-based)
  judge <kind> ok|wrong               parameter verdict
  extracted <kind> <text>             corrected extracted info
  disamb <kind> <text>                corrected disambiguation result
  correct <kind> <value>              typed correction, e.g.
                                        correct metric 61535
                                        correct timeRange 2024-01-01 2024-03-31
                                        correct constraints 大区 in 华北; 子品牌 not in KA
                                        correct groupBy 月份,大区
                                        correct sorting desc top 3
                                        correct calculation on
  sync <kind>                         copy sub-query 1's verdict for <kind>
  stage <stage> <v1>, <v2>, ...       correct a metric pipeline stage
  search <text>                       search the metric catalog
  dims                                list dimensions allowed in constraints and groupBy
  next | back                         move forward / backward
  show | status | help | quit
Kinds: metric timeRange constraints groupBy sorting calculation";

/// Parse one interactive command line.
pub fn parse_command(line: &str, catalog: &Catalog) -> Result<Command, WizardError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let intent = match verb.to_ascii_lowercase().as_str() {
        "" | "show" => return Ok(Command::Show),
        "status" => return Ok(Command::Status),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "search" => return Ok(Command::Search(rest.to_string())),
        "dims" => return Ok(Command::Dimensions),
        "next" | "n" => Intent::Next,
        "back" | "b" => Intent::Back,
        "choice" => Intent::SelectChoice {
            choice: rest.parse()?,
        },
        "suggest" => Intent::SetSuggestion {
            text: rest.to_string(),
        },
        "decomp" => Intent::SetDecompositionCorrect {
            is_correct: parse_verdict(rest)?,
        },
        "add" => Intent::AddCustomQuery {
            text: rest.to_string(),
        },
        "remove" => Intent::RemoveCustomQuery {
            index: parse_position(rest)?,
        },
        "judge" => {
            let (kind, verdict) = split_kind(rest)?;
            Intent::SetJudgment {
                kind,
                is_correct: parse_verdict(verdict)?,
            }
        }
        "extracted" => {
            let (kind, value) = split_kind(rest)?;
            Intent::SetUserField {
                kind,
                field: UserField::ExtractedInfo,
                value: value.to_string(),
            }
        }
        "disamb" => {
            let (kind, value) = split_kind(rest)?;
            Intent::SetUserField {
                kind,
                field: UserField::DisambiguationResult,
                value: value.to_string(),
            }
        }
        "correct" => {
            let (kind, value) = split_kind(rest)?;
            Intent::ApplyCorrection {
                correction: Correction::parse(kind, value, catalog)?,
            }
        }
        "sync" => Intent::SyncFromFirst { kind: rest.parse()? },
        "stage" => {
            let (stage, values) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Intent::AnnotateStage {
                stage: stage.parse()?,
                values: StageCorrection::values_from_text(values),
            }
        }
        _ => return Err(WizardError::unknown("command", verb)),
    };
    Ok(Command::Intent(intent))
}

fn split_kind(rest: &str) -> Result<(ParameterKind, &str), WizardError> {
    let (kind, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    Ok((kind.parse()?, value.trim()))
}

fn parse_verdict(value: &str) -> Result<bool, WizardError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "ok" | "correct" | "yes" | "y" | "true" => Ok(true),
        "wrong" | "incorrect" | "no" | "n" | "false" => Ok(false),
        _ => Err(WizardError::unknown("verdict", value)),
    }
}

fn parse_position(value: &str) -> Result<usize, WizardError> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .ok_or_else(|| WizardError::unknown("position", value))
}

#[cfg(test)]
#[path = "intent_tests.rs"]
mod tests;
