//! `connect` command line entry point.
//!
//! # Responsibility
//! - Load configuration, start logging and open the store once.
//! - Print one JSON envelope per invocation on stdout.
//!
//! Exit codes: 0 success, 2 validation failure, 3 not found, 1 otherwise.

use commands::Response;
use config::Cli;
use connect_core::db::{open_db, open_db_in_memory};
use std::process::ExitCode;

mod commands;
mod config;

fn main() -> ExitCode {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    if let Err(err) = connect_core::init_logging(cli.log_level(), cli.log_dir.as_deref()) {
        eprintln!("connect: {err}");
        return ExitCode::FAILURE;
    }

    let opened = if cli.in_memory {
        open_db_in_memory()
    } else {
        open_db(&cli.db_path)
    };
    let response = match opened {
        Ok(conn) => commands::run(cli.command, &conn),
        Err(err) => Response::internal("Unable to open database", err),
    };

    match serde_json::to_string_pretty(&response.envelope) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("connect: failed to encode response: {err}");
            return ExitCode::FAILURE;
        }
    }
    response.exit_code()
}
