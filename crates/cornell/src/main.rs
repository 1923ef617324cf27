use anyhow::Result;
use clap::Parser;

mod cli;
mod log;

use cli::{Cli, ux};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The local time offset can only be read while the process is single
    // threaded, so logging is set up before the runtime starts.
    if let Err(e) = log::setup_logging(cli.verbose) {
        ux::present_error(e);
        std::process::exit(1);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    if let Err(e) = runtime.block_on(cli::run(&cli)) {
        ux::present_error(e);
        std::process::exit(1);
    }
    Ok(())
}
