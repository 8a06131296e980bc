use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::info;

use crate::cli::ReplayArgs;
use crate::commands::{open_session, replay_intents};
use crate::util::{emit_json, load_intents};

pub fn run(args: ReplayArgs, config: Option<&Path>) -> Result<()> {
    let (mut session, _) = open_session(config, &args.session)?;
    let intents = load_intents(&args.intents)?;
    let blocked = replay_intents(&mut session, &intents, &args.intents)?;
    info!(
        intents = intents.len(),
        blocked,
        step = %session.step(),
        query_index = session.query_index(),
        completed = session.is_completed(),
        "replay finished"
    );
    if args.require_complete && !session.is_completed() {
        let status = session.status();
        return Err(anyhow!(
            "record not completed (step {}, sub-query {}): {}",
            status.step,
            status.query_index + 1,
            status.next_action
        ));
    }
    emit_json(args.out.as_deref(), session.record())
}
