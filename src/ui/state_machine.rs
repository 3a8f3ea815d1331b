use super::view::{view_for, ViewModel, ViewSink};
use super::UiState;
use crate::session::CaptureSession;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Authoritative source of the UI mode.
///
/// All components request transitions here; nothing else renders. Each
/// accepted transition updates the shared state cell and pushes exactly
/// one complete [`ViewModel`] to the sink, so observers never see a frame
/// mixing two states' affordances.
pub struct StateMachine {
    state: UiState,
    status: String,
    session: Option<CaptureSession>,
    state_cell: Arc<RwLock<UiState>>,
    sink: Arc<dyn ViewSink>,
}

impl StateMachine {
    /// Create a state machine in `Idle` and paint the initial frame.
    pub fn new(sink: Arc<dyn ViewSink>) -> Self {
        let mut machine = Self {
            state: UiState::Idle,
            status: String::new(),
            session: None,
            state_cell: Arc::new(RwLock::new(UiState::Idle)),
            sink,
        };
        machine.apply();
        machine
    }

    pub fn current(&self) -> UiState {
        self.state
    }

    /// Shared read-only snapshot of the current state for observers.
    pub fn state_cell(&self) -> Arc<RwLock<UiState>> {
        Arc::clone(&self.state_cell)
    }

    /// The session retained for display, if any.
    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    /// The view the sink last received.
    pub fn current_view(&self) -> ViewModel {
        view_for(self.state, self.session.as_ref(), &self.status)
    }

    /// Idle -> Camera, on successful camera acquisition.
    pub fn enter_camera(&mut self) -> bool {
        if self.state != UiState::Idle {
            debug!("Scan request ignored in state {:?}", self.state);
            return false;
        }
        self.state = UiState::Camera;
        self.status.clear();
        self.apply();
        true
    }

    /// Camera -> Processing, first step of a capture attempt.
    pub fn enter_processing(&mut self) -> bool {
        if self.state != UiState::Camera {
            debug!("Capture trigger ignored in state {:?}", self.state);
            return false;
        }
        self.state = UiState::Processing;
        self.apply();
        true
    }

    /// Processing -> Results, retaining the completed session for display.
    pub fn enter_results(&mut self, session: CaptureSession) -> bool {
        if self.state != UiState::Processing {
            warn!(
                "Results transition ignored in state {:?}; discarding session {}",
                self.state, session.id
            );
            return false;
        }
        self.state = UiState::Results;
        self.session = Some(session);
        self.apply();
        true
    }

    /// Any state -> Idle. Clears the transient status and retained session.
    pub fn reset_to_idle(&mut self) {
        if self.state != UiState::Idle {
            debug!("Resetting to idle from {:?}", self.state);
        }
        self.state = UiState::Idle;
        self.status.clear();
        self.session = None;
        self.apply();
    }

    /// Forced transition to Idle with an error status, used for pipeline
    /// failures. The partial session is discarded.
    pub fn fail_to_idle<S: Into<String>>(&mut self, status: S) {
        self.state = UiState::Idle;
        self.session = None;
        self.status = status.into();
        self.apply();
    }

    /// Update the transient status line without changing state.
    pub fn set_status<S: Into<String>>(&mut self, status: S) {
        self.status = status.into();
        self.apply();
    }

    /// Recompute the view and hand it to the sink in one call.
    fn apply(&mut self) {
        *self.state_cell.write() = self.state;
        let view = view_for(self.state, self.session.as_ref(), &self.status);
        self.sink.render(&view);
    }
}
