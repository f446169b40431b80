//! Resolution result published after every cycle.

use serde::Serialize;

use crate::trip::TripCollection;

/// Lifecycle status of the current resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStatus {
    /// No identifiers selected.
    #[default]
    Idle,
    /// A cycle is in flight.
    Loading,
    /// Data is available.
    Ready,
    /// The lookup succeeded but nothing matched.
    Empty,
    /// The lookup failed.
    Error,
}

/// Snapshot of what renderers should show.
///
/// `version` increases every time a cycle commits new data, so a renderer can
/// skip redraws when it has already drawn the current version.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionState {
    /// Displayed trips, present only when `status` is `Ready`.
    pub data: Option<TripCollection>,
    /// Monotonic data version, starting at zero.
    pub version: u64,
    /// Current status.
    pub status: ResolutionStatus,
    /// Explanation for `Empty` and `Error`.
    pub message: Option<String>,
}

impl ResolutionState {
    /// Whether a cycle is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, ResolutionStatus::Loading)
    }
}
