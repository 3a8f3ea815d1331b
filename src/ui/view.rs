use super::UiState;
use crate::session::CaptureSession;
use tracing::debug;

/// Complete affordance set for one rendered frame.
///
/// Built only by [`view_for`], so a rendered frame can never mix
/// affordances from two states.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub state: UiState,
    pub scan_control_visible: bool,
    pub video_visible: bool,
    pub busy_visible: bool,
    pub results_visible: bool,
    /// Prompt shown over the active surface
    pub prompt: &'static str,
    /// Transient status line; empty when nothing to report
    pub status: String,
    /// Extracted text of the retained session, shown in the results panel
    pub extracted_text: Option<String>,
    /// Byte length of the embedded image preview, 0 when none
    pub image_preview_bytes: usize,
    /// Interpretation-status line of the results panel
    pub interpretation_status: Option<&'static str>,
}

/// Compute the affordance set for a state, retained session, and status text.
pub fn view_for(state: UiState, session: Option<&CaptureSession>, status: &str) -> ViewModel {
    let base = ViewModel {
        state,
        scan_control_visible: false,
        video_visible: false,
        busy_visible: false,
        results_visible: false,
        prompt: "",
        status: status.to_string(),
        extracted_text: None,
        image_preview_bytes: 0,
        interpretation_status: None,
    };

    match state {
        UiState::Idle => ViewModel {
            scan_control_visible: true,
            prompt: "Press S to scan a receipt",
            ..base
        },
        UiState::Camera => ViewModel {
            video_visible: true,
            prompt: "Tap to capture",
            ..base
        },
        UiState::Processing => ViewModel {
            busy_visible: true,
            prompt: "Reading receipt...",
            ..base
        },
        UiState::Results => ViewModel {
            results_visible: true,
            prompt: "Press A to scan again",
            extracted_text: session.map(|s| s.extracted_text.clone()),
            image_preview_bytes: session.map(|s| s.image_jpeg.len()).unwrap_or(0),
            interpretation_status: Some("Sent for interpretation"),
            ..base
        },
    }
}

/// Rendering boundary. Implementations must apply the whole view in one
/// call; the state machine never exposes partially-updated affordances.
pub trait ViewSink: Send + Sync {
    fn render(&self, view: &ViewModel);
}

/// Sink recording every rendered frame, for development and tests.
pub struct RecordingView {
    views: parking_lot::Mutex<Vec<ViewModel>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self {
            views: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// All frames rendered so far, in order.
    pub fn views(&self) -> Vec<ViewModel> {
        self.views.lock().clone()
    }

    /// The most recent frame.
    pub fn last(&self) -> Option<ViewModel> {
        self.views.lock().last().cloned()
    }
}

impl Default for RecordingView {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewSink for RecordingView {
    fn render(&self, view: &ViewModel) {
        self.views.lock().push(view.clone());
    }
}

/// Console renderer for headless/terminal operation.
pub struct ConsoleView;

impl ViewSink for ConsoleView {
    fn render(&self, view: &ViewModel) {
        debug!("Rendering view for state {:?}", view.state);

        let mut line = format!("[{}] {}", view.state.name(), view.prompt);
        if view.results_visible {
            if let Some(text) = &view.extracted_text {
                line.push_str(&format!(" | text: {:?}", text));
            }
            if view.image_preview_bytes > 0 {
                line.push_str(&format!(" | image: {} bytes", view.image_preview_bytes));
            }
            if let Some(interp) = view.interpretation_status {
                line.push_str(&format!(" | {}", interp));
            }
        }
        if !view.status.is_empty() {
            line.push_str(&format!(" | {}", view.status));
        }
        println!("{}", line);
    }
}
