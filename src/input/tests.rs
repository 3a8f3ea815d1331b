use super::{route, InputAction, RawInput};
use crate::ui::UiState;

#[test]
fn test_capture_triggers_only_in_camera() {
    let triggers = [
        RawInput::VolumeUp,
        RawInput::VolumeDown,
        RawInput::CaptureKey,
        RawInput::Space,
        RawInput::Enter,
        RawInput::VideoTap,
    ];

    for input in triggers {
        assert_eq!(
            route(input, UiState::Camera),
            Some(InputAction::TriggerCapture),
            "{:?} should trigger capture in Camera",
            input
        );
        for state in [UiState::Idle, UiState::Processing, UiState::Results] {
            assert_eq!(
                route(input, state),
                None,
                "{:?} should be a no-op in {:?}",
                input,
                state
            );
        }
    }
}

#[test]
fn test_wheel_zooms_only_in_camera() {
    assert_eq!(
        route(RawInput::WheelUp, UiState::Camera),
        Some(InputAction::ZoomDelta(1))
    );
    assert_eq!(
        route(RawInput::WheelDown, UiState::Camera),
        Some(InputAction::ZoomDelta(-1))
    );

    for state in [UiState::Idle, UiState::Processing, UiState::Results] {
        assert_eq!(route(RawInput::WheelUp, state), None);
        assert_eq!(route(RawInput::WheelDown, state), None);
    }
}

#[test]
fn test_cancel_resets_in_any_state() {
    for state in [
        UiState::Idle,
        UiState::Camera,
        UiState::Processing,
        UiState::Results,
    ] {
        assert_eq!(route(RawInput::CancelKey, state), Some(InputAction::Reset));
    }
}

#[test]
fn test_focus_loss_resets_unconditionally() {
    for state in [
        UiState::Idle,
        UiState::Camera,
        UiState::Processing,
        UiState::Results,
    ] {
        assert_eq!(route(RawInput::FocusLost, state), Some(InputAction::Reset));
    }
}

#[test]
fn test_again_key_only_in_results() {
    assert_eq!(
        route(RawInput::AgainKey, UiState::Results),
        Some(InputAction::Reset)
    );
    for state in [UiState::Idle, UiState::Camera, UiState::Processing] {
        assert_eq!(route(RawInput::AgainKey, state), None);
    }
}

#[test]
fn test_scan_key_only_in_idle() {
    assert_eq!(
        route(RawInput::ScanKey, UiState::Idle),
        Some(InputAction::RequestScan)
    );
    for state in [UiState::Camera, UiState::Processing, UiState::Results] {
        assert_eq!(route(RawInput::ScanKey, state), None);
    }
}

#[test]
fn test_email_key_only_in_results() {
    assert_eq!(
        route(RawInput::EmailKey, UiState::Results),
        Some(InputAction::EmailResults)
    );
    for state in [UiState::Idle, UiState::Camera, UiState::Processing] {
        assert_eq!(route(RawInput::EmailKey, state), None);
    }
}
