use anyhow::Result;
use query_annotator::review::{run_review, ReviewEnd};
use query_annotator::screen::ScreenOptions;
use std::io;
use std::path::Path;
use tracing::warn;

use crate::cli::ReviewArgs;
use crate::commands::open_session;
use crate::util::emit_json;

pub fn run(args: ReviewArgs, config: Option<&Path>) -> Result<()> {
    let (mut session, config) = open_session(config, &args.session)?;
    let options = ScreenOptions {
        show_disambiguation: config.show_disambiguation,
    };
    let end = {
        let stdin = io::stdin().lock();
        let mut stdout = io::stdout().lock();
        run_review(&mut session, options, stdin, &mut stdout)?
    };
    match end {
        ReviewEnd::Completed => emit_json(args.out.as_deref(), session.record()),
        ReviewEnd::Quit | ReviewEnd::EndOfInput => {
            warn!(
                step = %session.step(),
                query_index = session.query_index(),
                "review ended before completion; record not written"
            );
            Ok(())
        }
    }
}
