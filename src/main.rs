mod fees;
mod ipc;
mod query;
mod roster;
mod seed;

use anyhow::Context;
use clap::Parser;
use std::io;

/// Student fee roster sidecar. Speaks newline-delimited JSON on stdin/stdout.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Start with the sample roster loaded.
    #[arg(long)]
    seed_demo: bool,

    /// Log filter (e.g. `info`, `feedeskd=debug`). Falls back to RUST_LOG, then `warn`.
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    // Logs go to stderr; stdout is the response channel.
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut state = ipc::AppState::default();
    if args.seed_demo {
        seed::load_demo(&mut state.roster).context("seed demo roster")?;
    }

    log::info!(
        "feedeskd {} ready, {} students",
        env!("CARGO_PKG_VERSION"),
        state.roster.store().len()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    ipc::serve(&mut state, stdin.lock(), stdout.lock())
}

fn main() {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    if let Err(e) = run(&args) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
