use super::*;
use crate::bridge::{BridgePayload, RecordingBridge};
use crate::camera::MockVideoBackend;
use crate::config::ReceiptcamConfig;
use crate::input::{route, InputAction, RawInput};
use crate::ocr::MockOcrEngine;
use crate::ui::{RecordingView, UiState};
use std::sync::Arc;

const RECEIPT_TEXT: &str = "Coffee Shop — $4.50";

struct Fixture {
    orchestrator: ReceiptcamOrchestrator,
    backend: Arc<MockVideoBackend>,
    bridge: Arc<RecordingBridge>,
    view: Arc<RecordingView>,
}

fn fixture_with_backend(backend: MockVideoBackend) -> Fixture {
    let mut config = ReceiptcamConfig::default();
    // Tests drive actions directly; no terminal handler
    config.input.keyboard = false;

    let backend = Arc::new(backend);
    let bridge = Arc::new(RecordingBridge::new());
    let view = Arc::new(RecordingView::new());

    let orchestrator = ReceiptcamOrchestrator::new(
        config,
        Arc::clone(&backend) as Arc<dyn crate::camera::VideoBackend>,
        Arc::new(MockOcrEngine::with_text(RECEIPT_TEXT)),
        Arc::clone(&bridge) as Arc<dyn crate::bridge::HostBridge>,
        Arc::clone(&view) as Arc<dyn crate::ui::ViewSink>,
    );

    Fixture {
        orchestrator,
        backend,
        bridge,
        view,
    }
}

fn fixture() -> Fixture {
    fixture_with_backend(MockVideoBackend::new())
}

/// Feed a raw input through the router exactly as the run loop does.
async fn feed(f: &mut Fixture, input: RawInput) {
    let state = f.orchestrator.state_machine.current();
    if let Some(action) = route(input, state) {
        f.orchestrator.handle_action(action).await;
    }
}

#[tokio::test]
async fn test_scan_denied_stays_idle_with_access_error() {
    let mut f = fixture_with_backend(MockVideoBackend::new().denying_access());

    feed(&mut f, RawInput::ScanKey).await;

    assert_eq!(f.orchestrator.state_machine.current(), UiState::Idle);
    assert!(!f.orchestrator.camera.is_held());

    let last = f.view.last().unwrap();
    assert!(!last.video_visible);
    assert_eq!(last.status, "Camera access denied. Check permissions");
}

#[tokio::test]
async fn test_full_scan_to_results_flow() {
    let mut f = fixture();

    feed(&mut f, RawInput::ScanKey).await;
    assert_eq!(f.orchestrator.state_machine.current(), UiState::Camera);
    assert!(f.orchestrator.camera.is_held());

    feed(&mut f, RawInput::VideoTap).await;
    assert_eq!(f.orchestrator.state_machine.current(), UiState::Results);
    assert!(!f.orchestrator.camera.is_held());

    // Hardware still path used when available
    assert!(f.backend.calls().contains(&"still_native".to_string()));

    let posted = f.bridge.posted();
    assert_eq!(posted.len(), 1);
    match &posted[0] {
        BridgePayload::Interpretation(request) => {
            assert_eq!(request.extracted_text, RECEIPT_TEXT);
            assert!(!request.image.is_empty());
        }
        other => panic!("Unexpected payload: {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_from_results_clears_everything() {
    let mut f = fixture();
    feed(&mut f, RawInput::ScanKey).await;
    feed(&mut f, RawInput::VideoTap).await;
    assert_eq!(f.orchestrator.state_machine.current(), UiState::Results);

    feed(&mut f, RawInput::CancelKey).await;

    assert_eq!(f.orchestrator.state_machine.current(), UiState::Idle);
    let last = f.view.last().unwrap();
    assert!(last.extracted_text.is_none());
    assert_eq!(last.image_preview_bytes, 0);
    assert!(last.interpretation_status.is_none());
}

#[tokio::test]
async fn test_focus_loss_in_camera_releases_resource() {
    let mut f = fixture();
    feed(&mut f, RawInput::ScanKey).await;
    assert!(f.orchestrator.camera.is_held());

    feed(&mut f, RawInput::FocusLost).await;

    assert_eq!(f.orchestrator.state_machine.current(), UiState::Idle);
    assert!(!f.orchestrator.camera.is_held());
    assert!(f.backend.calls().contains(&"stop".to_string()));
}

#[tokio::test]
async fn test_capture_trigger_ignored_in_idle_and_results() {
    let mut f = fixture();

    feed(&mut f, RawInput::Space).await;
    assert_eq!(f.orchestrator.state_machine.current(), UiState::Idle);
    assert!(f.backend.calls().is_empty());

    feed(&mut f, RawInput::ScanKey).await;
    feed(&mut f, RawInput::VideoTap).await;
    assert_eq!(f.orchestrator.state_machine.current(), UiState::Results);

    let calls_before = f.backend.calls().len();
    feed(&mut f, RawInput::Space).await;
    assert_eq!(f.orchestrator.state_machine.current(), UiState::Results);
    assert_eq!(f.backend.calls().len(), calls_before);
    assert_eq!(f.bridge.posted().len(), 1);
}

#[tokio::test]
async fn test_scan_again_restarts_cycle() {
    let mut f = fixture();
    feed(&mut f, RawInput::ScanKey).await;
    feed(&mut f, RawInput::VideoTap).await;

    feed(&mut f, RawInput::AgainKey).await;
    assert_eq!(f.orchestrator.state_machine.current(), UiState::Idle);

    feed(&mut f, RawInput::ScanKey).await;
    assert_eq!(f.orchestrator.state_machine.current(), UiState::Camera);

    // A fresh hardware request was issued for the reacquisition
    assert_eq!(f.orchestrator.camera.hardware_requests(), 2);
}

#[tokio::test]
async fn test_zoom_only_acts_in_camera() {
    let mut f = fixture();

    feed(&mut f, RawInput::WheelUp).await;
    assert_eq!(f.orchestrator.camera.zoom_level(), None);

    feed(&mut f, RawInput::ScanKey).await;
    assert_eq!(f.orchestrator.camera.zoom_level(), Some(1.0));

    feed(&mut f, RawInput::WheelUp).await;
    assert_eq!(f.orchestrator.camera.zoom_level(), Some(1.1));

    feed(&mut f, RawInput::WheelDown).await;
    assert_eq!(f.orchestrator.camera.zoom_level(), Some(1.0));
}

#[tokio::test]
async fn test_email_from_results() {
    let mut f = fixture();
    feed(&mut f, RawInput::ScanKey).await;
    feed(&mut f, RawInput::VideoTap).await;

    feed(&mut f, RawInput::EmailKey).await;

    let posted = f.bridge.posted();
    assert_eq!(posted.len(), 2);
    match &posted[1] {
        BridgePayload::EmailSend(request) => assert_eq!(request.body, RECEIPT_TEXT),
        other => panic!("Unexpected payload: {:?}", other),
    }
    assert_eq!(f.orchestrator.state_machine.current(), UiState::Results);
}

#[tokio::test]
async fn test_quit_resets_before_shutdown() {
    let mut f = fixture();
    feed(&mut f, RawInput::ScanKey).await;
    assert!(f.orchestrator.camera.is_held());

    let action = route(RawInput::QuitKey, f.orchestrator.state_machine.current()).unwrap();
    assert_eq!(action, InputAction::Shutdown);
    let keep_running = f.orchestrator.handle_action(action).await;

    assert!(!keep_running);
    assert!(!f.orchestrator.camera.is_held());
    assert_eq!(f.orchestrator.state_machine.current(), UiState::Idle);
}
