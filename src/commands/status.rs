use anyhow::Result;
use query_annotator::steps::Step;
use std::path::Path;

use crate::cli::StatusArgs;
use crate::commands::{open_session, replay_intents};
use crate::util::{emit_json, load_intents};

pub fn run(args: StatusArgs, config: Option<&Path>) -> Result<()> {
    let (mut session, _) = open_session(config, &args.session)?;
    if let Some(path) = &args.intents {
        let intents = load_intents(path)?;
        replay_intents(&mut session, &intents, path)?;
    }
    let status = session.status();
    if args.json {
        return emit_json(None, &status);
    }

    println!(
        "step {}/{}: {} ({})",
        status.step_number, status.total_steps, status.step_label, status.step
    );
    if status.step == Step::ParameterExtraction {
        println!(
            "sub-query {}/{}",
            status.query_index + 1,
            status.query_count
        );
    }
    println!("completed: {}", status.completed);
    println!("can advance: {}", status.can_advance);
    for blocker in &status.blockers {
        println!("blocked by {}: {}", blocker.field, blocker.reason);
    }
    println!("next: {}", status.next_action);
    Ok(())
}
