use std::process::ExitCode;

use clap::Parser;
use invoice_validator::cli::{self, args::ValidatorArgs};

fn main() -> miette::Result<ExitCode> {
    let args = ValidatorArgs::parse();
    cli::init_tracing();
    Ok(cli::run(args)?)
}
