//! JSON payloads written by the CLI.

use std::io::Write;

use serde::Serialize;
use transit_core::{MapView, ResolutionState, ResolutionStatus, TripCollection, TripDetails};

use crate::CliError;

/// Everything a renderer needs to display one resolution.
#[derive(Debug, Serialize)]
pub(crate) struct RenderPayload {
    pub(crate) status: ResolutionStatus,
    pub(crate) version: u64,
    pub(crate) message: Option<String>,
    pub(crate) view: MapView,
    pub(crate) features: Vec<FeatureSummary>,
    pub(crate) data: Option<TripCollection>,
}

/// Popup content for one trip.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub(crate) enum FeatureSummary {
    /// All popup properties are present.
    Complete(TripDetails),
    /// The listed properties are missing.
    Incomplete { missing: Vec<&'static str> },
}

impl From<&ResolutionState> for RenderPayload {
    fn from(state: &ResolutionState) -> Self {
        let (view, features) = state.data.as_ref().map_or_else(
            || (MapView::default(), Vec::new()),
            |data| (MapView::fit(data), summarise(data)),
        );
        Self {
            status: state.status,
            version: state.version,
            message: state.message.clone(),
            view,
            features,
            data: state.data.clone(),
        }
    }
}

fn summarise(data: &TripCollection) -> Vec<FeatureSummary> {
    data.details()
        .into_iter()
        .map(|outcome| match outcome {
            Ok(details) => FeatureSummary::Complete(details),
            Err(missing) => FeatureSummary::Incomplete {
                missing: missing.missing,
            },
        })
        .collect()
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
