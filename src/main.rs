mod cli;
mod commands;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, RootArgs};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args = RootArgs::parse();
    let config = args.config.as_deref();

    match args.command {
        Command::Sample(cmd) => commands::sample::run(cmd),
        Command::Status(cmd) => commands::status::run(cmd, config),
        Command::Replay(cmd) => commands::replay::run(cmd, config),
        Command::Review(cmd) => commands::review::run(cmd, config),
        Command::Config(cmd) => commands::config::run(cmd),
    }
}
