//! Error types emitted by the transit CLI.
//!
//! Resolution failures are not errors here: an `Empty` or `Error` outcome is
//! reported in the render payload and the process still exits successfully.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use transit_core::TripSourceError;
use transit_core::cache::SqliteCacheStoreError;
use transit_data::SourceBuildError;

/// Errors emitted by the transit CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// Neither a vehicle nor a route was selected.
    #[error("missing selection (set --{vehicle} or --{route}, or {vehicle_env} or {route_env})")]
    MissingSelection {
        /// Vehicle flag name.
        vehicle: &'static str,
        /// Route flag name.
        route: &'static str,
        /// Vehicle environment variable.
        vehicle_env: &'static str,
        /// Route environment variable.
        route_env: &'static str,
    },
    /// The cache lifetime must be positive.
    #[error("--{field} must be greater than zero")]
    InvalidTtl {
        /// Flag name.
        field: &'static str,
    },
    /// Constructing the HTTP trip source failed.
    #[error("failed to build trip source for {base_url:?}: {source}")]
    BuildTripSource {
        /// Configured service URL.
        base_url: String,
        /// Underlying failure.
        #[source]
        source: SourceBuildError,
    },
    /// The cache database directory could not be created.
    #[error("failed to create cache directory {path:?}: {source}")]
    CreateCacheDir {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite cache failed.
    #[error("failed to open cache database {path:?}: {source}")]
    OpenCache {
        /// Database path.
        path: Utf8PathBuf,
        /// Store failure.
        #[source]
        source: SqliteCacheStoreError,
    },
    /// The async runtime could not start.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Fetching the lookup lists failed.
    #[error("failed to fetch lookup lists: {0}")]
    Suggestions(#[source] TripSourceError),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
