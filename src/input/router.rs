use super::{InputAction, RawInput};
use crate::ui::UiState;

/// Normalize a decoded input into a semantic action, filtered by the
/// current UI state. Returns `None` when the input is not honored in this
/// state.
pub fn route(input: RawInput, state: UiState) -> Option<InputAction> {
    use InputAction::*;
    use RawInput::*;

    match input {
        // Capture triggers are only honored with the live preview up
        VolumeUp | VolumeDown | CaptureKey | Space | Enter | VideoTap => {
            (state == UiState::Camera).then_some(TriggerCapture)
        }

        // Zoom only acts on an active camera
        WheelUp => (state == UiState::Camera).then_some(ZoomDelta(1)),
        WheelDown => (state == UiState::Camera).then_some(ZoomDelta(-1)),

        // Cancel works everywhere; losing visibility resets unconditionally
        // so the camera is never held while not user-visible
        CancelKey | FocusLost => Some(Reset),

        // "Scan again" only makes sense with results on screen
        AgainKey => (state == UiState::Results).then_some(Reset),

        ScanKey => (state == UiState::Idle).then_some(RequestScan),
        EmailKey => (state == UiState::Results).then_some(EmailResults),
        QuitKey => Some(Shutdown),
    }
}
