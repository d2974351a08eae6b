mod aggregate;
mod cli;
mod commands;
mod model;
mod source;
mod util;
mod view;
mod workflow;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::source::LoadFailure;

fn main() {
    init_tracing();

    if let Err(err) = run() {
        if let Some(failure) = err.downcast_ref::<LoadFailure>() {
            println!(
                "Failed to load dashboard data. Make sure {} exists.",
                failure.source
            );
        }
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status(args) => commands::status::run(args),
        Commands::Chapters(args) => commands::chapters::run(args),
        Commands::Show(args) => commands::show::run(args),
        Commands::Editor(args) => commands::editor::run(args),
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
