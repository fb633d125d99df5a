//! Command-line interface for the roadfuel trip planner.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod solve;

pub use error::CliError;
use solve::{SolveArgs, run_solve};

pub(crate) const ARG_SOLVE_REQUEST: &str = "request";
pub(crate) const ARG_SOLVE_STATIONS: &str = "stations";
pub(crate) const ARG_SOLVE_RESOLUTION: &str = "resolution-km";
pub(crate) const ARG_SOLVE_MAX_CANDIDATES: &str = "max-candidates";
pub(crate) const ARG_SOLVE_TIME_LIMIT: &str = "time-limit-secs";
pub(crate) const ENV_SOLVE_REQUEST: &str = "ROADFUEL_CMDS_SOLVE_REQUEST_PATH";
pub(crate) const ENV_SOLVE_STATIONS: &str = "ROADFUEL_CMDS_SOLVE_STATIONS";

/// Run the roadfuel CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] when argument parsing, configuration, input
/// loading, planning or output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Solve(args) => run_solve(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "roadfuel",
    about = "Plan the cheapest refuelling stops for a road trip",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a trip from a JSON request and a JSON station dataset.
    Solve(SolveArgs),
}

#[cfg(test)]
mod tests;
