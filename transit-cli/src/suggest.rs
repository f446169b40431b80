//! Suggest command implementation for the transit CLI.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use transit_core::{ResultSink, Suggestions};
use transit_data::DEFAULT_BASE_URL;

use crate::locate::runtime;
use crate::output::write_json;
use crate::sink::LogSink;
use crate::source::{HttpTripSourceBuilder, TripSourceBuilder};
use crate::{ARG_BASE_URL, CliError};

/// CLI arguments for the `suggest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "List known vehicle references and published line names")]
#[ortho_config(prefix = "TRANSIT")]
pub(crate) struct SuggestArgs {
    /// Base URL of the trip service (e.g. "http://localhost:8000").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
}

impl SuggestArgs {
    fn into_base_url(self) -> Result<String, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(merged
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()))
    }
}

pub(crate) fn run_suggest(args: SuggestArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_suggest_with(args, &HttpTripSourceBuilder, &LogSink::default(), &mut stdout)
}

/// Fetch the lookup lists, publish them to `sink` and print them.
///
/// A failing list call fails the command; nothing is published.
pub(crate) fn run_suggest_with(
    args: SuggestArgs,
    builder: &dyn TripSourceBuilder,
    sink: &dyn ResultSink,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let base_url = args.into_base_url()?;
    let suggestions = fetch_suggestions(&base_url, builder)?;
    sink.publish_suggestions(&suggestions);
    write_json(writer, &suggestions)
}

fn fetch_suggestions(
    base_url: &str,
    builder: &dyn TripSourceBuilder,
) -> Result<Suggestions, CliError> {
    let source = builder.build(base_url)?;
    runtime()?
        .block_on(source.lookup_lists())
        .map_err(CliError::Suggestions)
}
