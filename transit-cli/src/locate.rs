//! Locate command implementation for the transit CLI.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use transit_core::cache::DEFAULT_TTL;
use transit_core::{IdentifierPair, QueryResolver, ResolverConfig, SystemClock};
use transit_data::DEFAULT_BASE_URL;

use crate::output::{RenderPayload, write_json};
use crate::sink::LogSink;
use crate::source::{HttpTripSourceBuilder, TripSourceBuilder};
use crate::store::CliCacheStore;
use crate::{
    ARG_BASE_URL, ARG_CACHE_DB, ARG_HEALTH_CHECK, ARG_ROUTE, ARG_TTL_SECS, ARG_VEHICLE, CliError,
    ENV_LOCATE_ROUTE, ENV_LOCATE_VEHICLE,
};

/// CLI arguments for the `locate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve a vehicle reference and/or published line name into \
                 trips. A vehicle takes precedence; a route alongside it \
                 narrows the vehicle's trips to that line. Results are cached \
                 for the configured lifetime.",
    about = "Locate trips for a vehicle or route"
)]
#[ortho_config(prefix = "TRANSIT")]
pub(crate) struct LocateArgs {
    /// Vehicle reference (e.g. "MTA NYCT_2257").
    #[arg(long = ARG_VEHICLE, value_name = "ref")]
    #[serde(default)]
    pub(crate) vehicle: Option<String>,
    /// Published line name (e.g. "B6").
    #[arg(long = ARG_ROUTE, value_name = "ref")]
    #[serde(default)]
    pub(crate) route: Option<String>,
    /// Base URL of the trip service (e.g. "http://localhost:8000").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// SQLite database persisting the trip cache between runs.
    #[arg(long = ARG_CACHE_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) cache_db: Option<Utf8PathBuf>,
    /// Cache entry lifetime in seconds.
    #[arg(long = ARG_TTL_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) ttl_secs: Option<u64>,
    /// Probe the service's readiness before fetching.
    #[arg(
        long = ARG_HEALTH_CHECK,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) health_check: Option<bool>,
}

impl LocateArgs {
    pub(crate) fn into_config(self) -> Result<LocateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LocateConfig::try_from(merged)
    }
}

/// Resolved `locate` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LocateConfig {
    /// Selection to resolve; never empty.
    pub(crate) pair: IdentifierPair,
    /// Trip service base URL.
    pub(crate) base_url: String,
    /// Persistent cache location; in-memory when absent.
    pub(crate) cache_db: Option<Utf8PathBuf>,
    /// Cache entry lifetime.
    pub(crate) ttl: Duration,
    /// Whether to probe readiness before fetching.
    pub(crate) health_check: bool,
}

impl LocateConfig {
    fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::default()
            .with_ttl(self.ttl)
            .with_health_check(self.health_check)
    }
}

impl TryFrom<LocateArgs> for LocateConfig {
    type Error = CliError;

    fn try_from(args: LocateArgs) -> Result<Self, Self::Error> {
        let pair =
            IdentifierPair::from_submission(args.vehicle.as_deref(), args.route.as_deref())
                .ok_or(CliError::MissingSelection {
                    vehicle: ARG_VEHICLE,
                    route: ARG_ROUTE,
                    vehicle_env: ENV_LOCATE_VEHICLE,
                    route_env: ENV_LOCATE_ROUTE,
                })?;
        let ttl = match args.ttl_secs {
            Some(0) => return Err(CliError::InvalidTtl { field: ARG_TTL_SECS }),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TTL,
        };
        Ok(Self {
            pair,
            base_url: args.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            cache_db: args.cache_db,
            ttl,
            health_check: args.health_check.unwrap_or(false),
        })
    }
}

pub(crate) fn run_locate(args: LocateArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_locate_with(args, &HttpTripSourceBuilder, &mut stdout)
}

pub(crate) fn run_locate_with(
    args: LocateArgs,
    builder: &dyn TripSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let payload = execute_locate(&config, builder)?;
    write_json(writer, &payload)
}

pub(crate) fn execute_locate(
    config: &LocateConfig,
    builder: &dyn TripSourceBuilder,
) -> Result<RenderPayload, CliError> {
    let source = builder.build(&config.base_url)?;
    let store = CliCacheStore::open(config.cache_db.as_deref())?;
    let sink = LogSink::default();
    let resolver = QueryResolver::with_config(
        source,
        store,
        SystemClock,
        &sink,
        &config.resolver_config(),
    );
    info!("locating {}", config.pair);
    let state = runtime()?.block_on(resolver.resolve(&config.pair));
    Ok(RenderPayload::from(&state))
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<LocateConfig, CliError> {
    let merged = LocateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    LocateConfig::try_from(merged)
}
