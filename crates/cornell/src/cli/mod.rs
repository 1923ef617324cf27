//! Cornell assistant cli definition and entrypoint.
mod repl;
pub mod ux;

use std::io::stdout;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cornell_core::config::get_config;
use cornell_core::responder::GeminiResponder;

/// Cornell - ask questions about Cornell University from the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file. Defaults to `cornell.yml` in the config directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write debug logs to the data directory.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs the interactive assistant until the user exits.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = get_config(cli.config.clone()).context("Failed to load configuration")?;
    let responder = GeminiResponder::new(&config).context("Failed to initialize assistant")?;

    let mut reader = repl::TerminalReader::new().context("Failed to initialize terminal")?;
    let mut stdout = stdout();
    repl::run(&responder, &mut reader, &mut stdout).await
}
