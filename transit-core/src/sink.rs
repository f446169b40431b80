//! Delivery of resolution results to rendering collaborators.

use std::rc::Rc;

use crate::resolver::{ResolutionState, ResolutionStatus};
use crate::source::Suggestions;
use crate::trip::TripCollection;

/// Receives every published resolution state and suggestion list.
pub trait ResultSink {
    /// Called whenever the resolution state changes.
    fn publish(&self, state: &ResolutionState);

    /// Called when lookup lists have been loaded.
    fn publish_suggestions(&self, suggestions: &Suggestions) {
        let _ = suggestions;
    }
}

impl<K: ResultSink + ?Sized> ResultSink for &K {
    fn publish(&self, state: &ResolutionState) {
        (**self).publish(state);
    }

    fn publish_suggestions(&self, suggestions: &Suggestions) {
        (**self).publish_suggestions(suggestions);
    }
}

impl<K: ResultSink + ?Sized> ResultSink for Rc<K> {
    fn publish(&self, state: &ResolutionState) {
        (**self).publish(state);
    }

    fn publish_suggestions(&self, suggestions: &Suggestions) {
        (**self).publish_suggestions(suggestions);
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn publish(&self, _state: &ResolutionState) {}
}

/// What a renderer should do in response to a published state.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderInstruction {
    /// Show a loading indicator and clear the map layer.
    Spinner,
    /// Show an empty layer, with an optional message.
    Clear {
        /// Text to display alongside the empty layer.
        message: Option<String>,
    },
    /// Replace the map layer.
    Draw {
        /// Trips to draw.
        data: TripCollection,
        /// Version being drawn.
        version: u64,
    },
    /// The current version is already on screen.
    Unchanged,
}

/// Tracks the drawn version so renderers redraw only when it changes.
///
/// # Examples
/// ```
/// use transit_core::resolver::{ResolutionState, ResolutionStatus};
/// use transit_core::sink::{RedrawTracker, RenderInstruction};
/// use transit_core::test_support::trip_collection;
///
/// let mut tracker = RedrawTracker::default();
/// let state = ResolutionState {
///     data: Some(trip_collection(&[("NYCT_1", "B6")])),
///     version: 1,
///     status: ResolutionStatus::Ready,
///     message: None,
/// };
/// assert!(matches!(tracker.instruction(&state), RenderInstruction::Draw { version: 1, .. }));
/// assert_eq!(tracker.instruction(&state), RenderInstruction::Unchanged);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RedrawTracker {
    drawn: Option<u64>,
}

impl RedrawTracker {
    /// Version currently on screen, if any.
    #[must_use]
    pub const fn drawn_version(&self) -> Option<u64> {
        self.drawn
    }

    /// Decide how to render `state`.
    pub fn instruction(&mut self, state: &ResolutionState) -> RenderInstruction {
        match (state.status, &state.data) {
            (ResolutionStatus::Ready, Some(data)) => {
                if self.drawn == Some(state.version) {
                    RenderInstruction::Unchanged
                } else {
                    self.drawn = Some(state.version);
                    RenderInstruction::Draw {
                        data: data.clone(),
                        version: state.version,
                    }
                }
            }
            (ResolutionStatus::Loading, _) => {
                self.drawn = None;
                RenderInstruction::Spinner
            }
            _ => {
                self.drawn = None;
                RenderInstruction::Clear {
                    message: state.message.clone(),
                }
            }
        }
    }
}
