mod state_machine;
mod view;
#[cfg(test)]
mod tests;

pub use state_machine::StateMachine;
pub use view::{view_for, ConsoleView, RecordingView, ViewModel, ViewSink};

use serde::{Deserialize, Serialize};

/// The authoritative UI mode. Exactly one state is active at any instant;
/// every observable affordance is a pure function of this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiState {
    /// Waiting for the user to request a scan
    Idle,
    /// Live preview is up, waiting for a capture trigger
    Camera,
    /// A capture attempt is running to completion
    Processing,
    /// A completed session is retained for display
    Results,
}

impl UiState {
    pub fn name(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::Camera => "camera",
            UiState::Processing => "processing",
            UiState::Results => "results",
        }
    }
}
