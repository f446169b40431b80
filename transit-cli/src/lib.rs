//! Command-line interface for locating buses by vehicle or route.
//!
//! `transit locate` resolves one vehicle/route selection through the caching
//! resolver and prints the render payload as JSON. `transit suggest` prints the
//! service's lookup lists. Options layer CLI flags over `TRANSIT_*`
//! environment variables over configuration files.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod locate;
mod output;
mod sink;
mod source;
mod store;
mod suggest;

pub use error::CliError;

use locate::{LocateArgs, run_locate};
use suggest::{SuggestArgs, run_suggest};

pub(crate) const ARG_VEHICLE: &str = "vehicle";
pub(crate) const ARG_ROUTE: &str = "route";
pub(crate) const ARG_BASE_URL: &str = "base-url";
pub(crate) const ARG_CACHE_DB: &str = "cache-db";
pub(crate) const ARG_TTL_SECS: &str = "ttl-secs";
pub(crate) const ARG_HEALTH_CHECK: &str = "health-check";
pub(crate) const ENV_LOCATE_VEHICLE: &str = "TRANSIT_CMDS_LOCATE_VEHICLE";
pub(crate) const ENV_LOCATE_ROUTE: &str = "TRANSIT_CMDS_LOCATE_ROUTE";

/// Run the transit CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// trip service cannot be reached for the lookup lists, or output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Locate(args) => run_locate(args),
        Command::Suggest(args) => run_suggest(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "transit",
    about = "Locate buses by vehicle reference or published line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a vehicle and/or route selection into trips.
    Locate(LocateArgs),
    /// List the vehicle and route identifiers the service knows.
    Suggest(SuggestArgs),
}

#[cfg(test)]
mod tests;
