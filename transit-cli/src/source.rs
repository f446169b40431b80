//! Construction of the trip source used by each command.

use transit_core::TripSource;
use transit_data::HttpTripSource;

use crate::CliError;

/// Builds the trip source for one command invocation.
pub(crate) trait TripSourceBuilder {
    fn build(&self, base_url: &str) -> Result<Box<dyn TripSource>, CliError>;
}

/// Builds an [`HttpTripSource`] for the configured service.
pub(crate) struct HttpTripSourceBuilder;

impl TripSourceBuilder for HttpTripSourceBuilder {
    fn build(&self, base_url: &str) -> Result<Box<dyn TripSource>, CliError> {
        let source =
            HttpTripSource::new(base_url).map_err(|source| CliError::BuildTripSource {
                base_url: base_url.to_owned(),
                source,
            })?;
        Ok(Box::new(source))
    }
}
