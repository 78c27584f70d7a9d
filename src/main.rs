use clap::Parser;
use desktidy::cli::{Cli, CliError, run_cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_cli(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        // Already written to the console and the run log.
        Err(CliError::Organize(_)) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
