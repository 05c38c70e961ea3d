use std::process::ExitCode;

use clap::Parser;

use retropaint::cli::{self, CliArgs};
use retropaint::logger;

fn main() -> ExitCode {
    logger::init();
    let args = CliArgs::parse();
    cli::run(args)
}
