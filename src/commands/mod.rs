pub mod config;
pub mod replay;
pub mod review;
pub mod sample;
pub mod status;

use anyhow::{Context, Result};
use query_annotator::config::{load_config, ReviewConfig};
use query_annotator::{AnnotationRecord, Intent, Outcome, Session};
use std::path::Path;
use tracing::{info, warn};

use crate::util::read_json;

/// Load the reviewer config and open a session over a record file.
fn open_session(config: Option<&Path>, session: &Path) -> Result<(Session, ReviewConfig)> {
    let config = load_config(config)?;
    let record: AnnotationRecord = read_json(session)?;
    let opened = Session::new(record, &config)
        .with_context(|| format!("open session {}", session.display()))?;
    info!(
        session = %session.display(),
        queries = opened.record().parameter_extractions.len(),
        "session opened"
    );
    Ok((opened, config))
}

/// Apply scripted intents in order; returns how many `next` intents were blocked.
fn replay_intents(
    session: &mut Session,
    intents: &[(usize, Intent)],
    origin: &Path,
) -> Result<usize> {
    let mut blocked = 0;
    for (line_no, intent) in intents {
        let outcome = session
            .apply(intent.clone())
            .with_context(|| format!("apply {} at {}:{line_no}", intent.name(), origin.display()))?;
        if let Outcome::Blocked { blockers } = outcome {
            blocked += 1;
            let fields: Vec<&str> = blockers.iter().map(|blocker| blocker.field.as_str()).collect();
            warn!(line = line_no, blockers = ?fields, "next blocked");
        }
    }
    Ok(blocked)
}
