use std::path::Path;

use clap::Parser;
use color_eyre::Result;
use env_logger::Target;
use sln2cmake::{cli::input::CliArgs, utils::logger::config_logger, worker::run_sln2cmake};

/// The entry point for the binary generated
/// for the program
fn main() -> Result<()> {
    color_eyre::install()?;
    let cli_args = CliArgs::parse();
    config_logger(cli_args.verbose, Target::Stdout)?;
    log::info!("Launching a new sln2cmake program");
    run_sln2cmake(&cli_args, Path::new("."))?;
    log::info!("Tasks successfully finished");

    Ok(())
}
