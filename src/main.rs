//! Twig - a terminal task list with nested dependencies

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = twig::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
