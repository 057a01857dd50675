// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging, hand off to `ui`.
// - Owns the exit status: handlers return errors, nothing below exits.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use cmdim::{cli::Cli, logging, ui};
use crossterm::style::Stylize;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match ui::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let status = ui::failure_status(&err);
            log::debug!(status:? = status; "command failed: {err:?}");
            if io::stderr().is_terminal() {
                eprintln!("{} {err:#}", "error:".red().bold());
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
