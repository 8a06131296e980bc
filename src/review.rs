//! Line-oriented interactive review loop.
//!
//! Reads one command per line, applies it to the session, and writes the
//! resulting screen or message. Input errors are reported and the loop goes
//! on; only I/O failures end it early.
use crate::intent::{parse_command, Command, COMMAND_HELP};
use crate::screen::{render_screen, ScreenOptions};
use crate::session::{Outcome, Session};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::debug;

/// How a review loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewEnd {
    Completed,
    Quit,
    EndOfInput,
}

pub fn run_review<R: BufRead, W: Write>(
    session: &mut Session,
    options: ScreenOptions,
    input: R,
    out: &mut W,
) -> Result<ReviewEnd> {
    write!(out, "{}", render_screen(session, options)).context("write screen")?;
    let mut lines = input.lines();
    loop {
        write!(out, "> ").context("write prompt")?;
        out.flush().context("flush prompt")?;
        let Some(line) = lines.next() else {
            writeln!(out).context("write newline")?;
            return Ok(ReviewEnd::EndOfInput);
        };
        let line = line.context("read command")?;
        let command = match parse_command(&line, session.catalog()) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "error: {err} (try `help`)").context("write error")?;
                continue;
            }
        };
        match command {
            Command::Show => {
                write!(out, "{}", render_screen(session, options)).context("write screen")?
            }
            Command::Status => {
                let status = session.status();
                let text = serde_json::to_string_pretty(&status).context("serialize status")?;
                writeln!(out, "{text}").context("write status")?;
            }
            Command::Help => writeln!(out, "{COMMAND_HELP}").context("write help")?,
            Command::Search(query) => {
                let hits = session.catalog().metrics.search(&query);
                if hits.is_empty() {
                    writeln!(out, "no metrics match {query:?}").context("write search")?;
                }
                for entry in hits {
                    writeln!(out, "  {}：{}", entry.id, entry.name).context("write search")?;
                }
            }
            Command::Dimensions => {
                let names = session.catalog().dimensions.names();
                if names.is_empty() {
                    writeln!(out, "no dimensions configured").context("write dimensions")?;
                } else {
                    writeln!(out, "  {}", names.join("，")).context("write dimensions")?;
                }
            }
            Command::Quit => return Ok(ReviewEnd::Quit),
            Command::Intent(intent) => match session.apply(intent) {
                Ok(Outcome::Updated) => writeln!(out, "ok").context("write ack")?,
                Ok(Outcome::Moved { .. }) => {
                    write!(out, "{}", render_screen(session, options)).context("write screen")?
                }
                Ok(Outcome::Blocked { blockers }) => {
                    writeln!(out, "cannot advance yet:").context("write blockers")?;
                    for blocker in blockers {
                        writeln!(out, "  {}: {}", blocker.field, blocker.reason)
                            .context("write blockers")?;
                    }
                }
                Ok(Outcome::Completed) => {
                    write!(out, "{}", render_screen(session, options)).context("write screen")?;
                    return Ok(ReviewEnd::Completed);
                }
                Err(err) => {
                    debug!(error = %err, "intent rejected");
                    writeln!(out, "error: {err}").context("write error")?;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run_review, ReviewEnd};
    use crate::config::ReviewConfig;
    use crate::record::{ParameterKind, UserChoice};
    use crate::sample::sample_record;
    use crate::screen::ScreenOptions;
    use crate::session::Session;
    use std::io::Cursor;

    fn review(script: &str) -> (Session, ReviewEnd, String) {
        let mut session =
            Session::new(sample_record(), &ReviewConfig::default()).expect("sample session");
        let mut out = Vec::new();
        let end = run_review(
            &mut session,
            ScreenOptions::default(),
            Cursor::new(script.as_bytes()),
            &mut out,
        )
        .expect("review loop");
        (session, end, String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn scripted_review_completes_record() {
        let script = "\
choice c
next
suggest 武汉今年每月二手佣金是多少？
next
next
judge groupBy wrong
extracted groupBy 每季度
correct groupBy 季度,大区
next
sync groupBy
next
next
";
        let (session, end, output) = review(script);
        assert_eq!(end, ReviewEnd::Completed);
        assert!(output.contains("cannot advance yet:"));
        assert!(output.contains("标注已完成"));
        let record = session.record();
        assert!(record.completed);
        assert_eq!(record.context_integration.user_choice, UserChoice::Replace);
        let synced = record.parameter_extractions[1]
            .parameters
            .get(ParameterKind::GroupBy);
        assert_eq!(synced.user_disambiguation_result, "按\"季度\",\"大区\"进行分组");
        assert!(!record.parameter_extractions[2]
            .parameters
            .get(ParameterKind::GroupBy)
            .user_extracted_info
            .contains('季'));
    }

    #[test]
    fn bad_commands_are_reported_and_loop_continues() {
        let (session, end, output) = review("frobnicate\njudge metric wrong\nquit\n");
        assert_eq!(end, ReviewEnd::Quit);
        assert!(output.contains("unknown command \"frobnicate\""));
        assert!(output.contains("action belongs to the parameter_extraction step"));
        assert!(!session.is_completed());
    }

    #[test]
    fn search_lists_catalog_hits_and_eof_ends_loop() {
        let (_, end, output) = review("search 佣金\n");
        assert_eq!(end, ReviewEnd::EndOfInput);
        assert!(output.contains("61535：总新签佣金"));
        assert!(output.contains("61539：应收佣金打折率"));
        assert!(!output.contains("61536"));
    }

    #[test]
    fn dims_lists_configured_dimensions() {
        let (_, end, output) = review("dims
quit
");
        assert_eq!(end, ReviewEnd::Quit);
        assert!(output.contains("业绩城市，大区，子品牌"), "{output}");
    }
}
