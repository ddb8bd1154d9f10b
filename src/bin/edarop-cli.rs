//! `edarop-cli`: a thin CLI over the serialized-solution interface.
//! `print-prob`/`print-sol` per spec §6; non-zero exit on I/O or decode
//! failure instead of panicking, mirroring the teacher's logging setup at
//! startup.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use edarop::cli::{Cli, Command};
use edarop::serialization;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Command::PrintProb { file } => serialization::load(file).map(|solution| {
            edarop::cli::print_problem(&solution.problem);
        }),
        Command::PrintSol { file } => serialization::load(file).map(|solution| {
            edarop::cli::print_solution(&solution);
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
