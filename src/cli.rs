//! CLI argument parsing for the annotation workflow.
//!
//! The CLI is thin: every subcommand loads a record, drives a `Session`, and
//! hands back the record as JSON. Review policy lives in the library.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "qannotate",
    version,
    about = "Human review of query-understanding output (context, decomposition, parameters)",
    after_help = "Commands:\n  sample [--out <file>]                       Write the built-in demo record\n  status --session <file> [--intents <file>]  Summarize the gate and next action\n  replay --session <file> --intents <file>    Apply a JSONL intent script\n  review --session <file>                     Interactive review on stdin/stdout\n  config [--path]                             Print a config stub or its default path\n\nExamples:\n  qannotate sample --out /tmp/session.json\n  qannotate review --session /tmp/session.json --out /tmp/annotated.json\n  qannotate replay --session /tmp/session.json --intents review.jsonl --require-complete\n  qannotate status --session /tmp/session.json --intents review.jsonl --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Reviewer config (default: <config_dir>/qannotate/config.json)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Sample(SampleArgs),
    Status(StatusArgs),
    Replay(ReplayArgs),
    Review(ReviewArgs),
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Write the built-in demo session record")]
pub struct SampleArgs {
    /// Output path (default: stdout)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Status command inputs for a single session record.
#[derive(Parser, Debug)]
#[command(about = "Summarize the current step, gate, and next action")]
pub struct StatusArgs {
    /// Session record JSON produced by the upstream pipeline
    #[arg(long, value_name = "FILE")]
    pub session: PathBuf,

    /// JSONL intents to replay before reporting
    #[arg(long, value_name = "FILE")]
    pub intents: Option<PathBuf>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Replay a JSONL intent script and emit the resulting record")]
pub struct ReplayArgs {
    #[arg(long, value_name = "FILE")]
    pub session: PathBuf,

    /// One intent per line; blank lines and `#` comments are skipped
    #[arg(long, value_name = "FILE")]
    pub intents: PathBuf,

    /// Output path for the record (default: stdout)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Fail unless the script completes the record
    #[arg(long)]
    pub require_complete: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Review a session interactively on stdin/stdout")]
pub struct ReviewArgs {
    #[arg(long, value_name = "FILE")]
    pub session: PathBuf,

    /// Where to write the completed record (default: stdout)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Print a default config stub")]
pub struct ConfigArgs {
    /// Print the default config location instead
    #[arg(long)]
    pub path: bool,
}
