use super::*;
use crate::session::CaptureSession;
use std::sync::Arc;
use uuid::Uuid;

fn test_session(text: &str) -> CaptureSession {
    CaptureSession::new(
        Uuid::new_v4(),
        vec![0xFF, 0xD8, 0xFF, 0xD9],
        1280,
        720,
        text.to_string(),
        Some(1.5),
    )
}

fn machine() -> (StateMachine, Arc<RecordingView>) {
    let view = Arc::new(RecordingView::new());
    let machine = StateMachine::new(Arc::clone(&view) as Arc<dyn ViewSink>);
    (machine, view)
}

fn visible_flags(view: &ViewModel) -> [bool; 4] {
    [
        view.scan_control_visible,
        view.video_visible,
        view.busy_visible,
        view.results_visible,
    ]
}

#[test]
fn test_each_state_shows_exactly_one_surface() {
    let session = test_session("text");
    for (state, expected) in [
        (UiState::Idle, [true, false, false, false]),
        (UiState::Camera, [false, true, false, false]),
        (UiState::Processing, [false, false, true, false]),
        (UiState::Results, [false, false, false, true]),
    ] {
        let view = view_for(state, Some(&session), "");
        assert_eq!(
            visible_flags(&view),
            expected,
            "affordances for {:?} must be exactly the prescribed set",
            state
        );
    }
}

#[test]
fn test_camera_view_prompts_capture() {
    let view = view_for(UiState::Camera, None, "");
    assert!(view.video_visible);
    assert!(!view.scan_control_visible);
    assert_eq!(view.prompt, "Tap to capture");
}

#[test]
fn test_results_view_carries_session() {
    let session = test_session("Coffee Shop — $4.50");
    let view = view_for(UiState::Results, Some(&session), "");
    assert_eq!(view.extracted_text.as_deref(), Some("Coffee Shop — $4.50"));
    assert!(view.image_preview_bytes > 0);
    assert_eq!(view.interpretation_status, Some("Sent for interpretation"));
}

#[test]
fn test_happy_path_transitions_in_order() {
    let (mut sm, view) = machine();

    assert!(sm.enter_camera());
    assert!(sm.enter_processing());
    assert!(sm.enter_results(test_session("t")));

    let states: Vec<UiState> = view.views().iter().map(|v| v.state).collect();
    assert_eq!(
        states,
        vec![
            UiState::Idle,
            UiState::Camera,
            UiState::Processing,
            UiState::Results
        ]
    );
}

#[test]
fn test_scan_request_is_noop_outside_idle() {
    let (mut sm, _) = machine();
    sm.enter_camera();

    assert!(!sm.enter_camera());
    assert_eq!(sm.current(), UiState::Camera);

    sm.enter_processing();
    assert!(!sm.enter_camera());
    assert_eq!(sm.current(), UiState::Processing);

    sm.enter_results(test_session("t"));
    assert!(!sm.enter_camera());
    assert_eq!(sm.current(), UiState::Results);
}

#[test]
fn test_capture_trigger_is_noop_outside_camera() {
    let (mut sm, view) = machine();

    assert!(!sm.enter_processing());
    assert_eq!(sm.current(), UiState::Idle);
    // A rejected transition renders nothing
    assert_eq!(view.views().len(), 1);
}

#[test]
fn test_results_requires_processing() {
    let (mut sm, _) = machine();
    assert!(!sm.enter_results(test_session("t")));
    assert_eq!(sm.current(), UiState::Idle);
    assert!(sm.session().is_none());
}

#[test]
fn test_reset_works_from_any_state() {
    let (mut sm, _) = machine();
    sm.reset_to_idle();
    assert_eq!(sm.current(), UiState::Idle);

    sm.enter_camera();
    sm.reset_to_idle();
    assert_eq!(sm.current(), UiState::Idle);

    sm.enter_camera();
    sm.enter_processing();
    sm.reset_to_idle();
    assert_eq!(sm.current(), UiState::Idle);
}

#[test]
fn test_reset_from_results_clears_everything() {
    let (mut sm, view) = machine();
    sm.enter_camera();
    sm.enter_processing();
    sm.enter_results(test_session("Coffee Shop — $4.50"));
    sm.set_status("Receipt emailed");

    sm.reset_to_idle();

    assert!(sm.session().is_none());
    let last = view.last().unwrap();
    assert_eq!(last.state, UiState::Idle);
    assert!(last.extracted_text.is_none());
    assert_eq!(last.image_preview_bytes, 0);
    assert!(last.interpretation_status.is_none());
    assert!(last.status.is_empty());
}

#[test]
fn test_entering_idle_clears_transient_status() {
    let (mut sm, view) = machine();
    sm.set_status("Camera access denied");
    assert_eq!(view.last().unwrap().status, "Camera access denied");

    sm.enter_camera();
    sm.reset_to_idle();
    assert!(view.last().unwrap().status.is_empty());
}

#[test]
fn test_fail_to_idle_sets_error_status_atomically() {
    let (mut sm, view) = machine();
    sm.enter_camera();
    sm.enter_processing();

    let frames_before = view.views().len();
    sm.fail_to_idle("Could not read the receipt. Try again");

    // Exactly one frame: Idle surface with the error status already set
    let views = view.views();
    assert_eq!(views.len(), frames_before + 1);
    let last = views.last().unwrap();
    assert_eq!(last.state, UiState::Idle);
    assert!(last.scan_control_visible);
    assert_eq!(last.status, "Could not read the receipt. Try again");
    assert!(sm.session().is_none());
}

#[test]
fn test_state_cell_tracks_current_state() {
    let (mut sm, _) = machine();
    let cell = sm.state_cell();
    assert_eq!(*cell.read(), UiState::Idle);

    sm.enter_camera();
    assert_eq!(*cell.read(), UiState::Camera);

    sm.reset_to_idle();
    assert_eq!(*cell.read(), UiState::Idle);
}

#[test]
fn test_every_rendered_frame_is_single_state() {
    let (mut sm, view) = machine();
    sm.enter_camera();
    sm.enter_processing();
    sm.enter_results(test_session("t"));
    sm.reset_to_idle();

    for frame in view.views() {
        let visible = visible_flags(&frame).iter().filter(|v| **v).count();
        assert_eq!(visible, 1, "frame for {:?} mixes surfaces", frame.state);
    }
}
