//! Result sink that narrates resolution progress through the log.

use std::cell::RefCell;

use log::{debug, info};
use transit_core::{RedrawTracker, RenderInstruction, ResolutionState, ResultSink, Suggestions};

/// Logs the render instruction for every published state.
#[derive(Debug, Default)]
pub(crate) struct LogSink {
    tracker: RefCell<RedrawTracker>,
}

impl ResultSink for LogSink {
    fn publish(&self, state: &ResolutionState) {
        match self.tracker.borrow_mut().instruction(state) {
            RenderInstruction::Spinner => debug!("loading trips"),
            RenderInstruction::Clear { message: Some(message) } => info!("{message}"),
            RenderInstruction::Clear { message: None } => debug!("selection cleared"),
            RenderInstruction::Draw { data, version } => {
                info!("drawing {} trips (version {version})", data.len());
            }
            RenderInstruction::Unchanged => debug!("version {} already drawn", state.version),
        }
    }

    fn publish_suggestions(&self, suggestions: &Suggestions) {
        debug!(
            "{} vehicles and {} routes available",
            suggestions.vehicles.len(),
            suggestions.routes.len()
        );
    }
}
