mod app;
mod cli;
mod config;
mod db;
mod logging;
mod paths;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let target = logging::LogTarget::for_command(cli.command.as_ref(), paths::log_file_path)?;
    logging::init(target)?;
    app::run(cli)
}
