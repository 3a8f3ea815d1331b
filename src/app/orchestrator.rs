use crate::bridge::HostBridge;
use crate::camera::{CameraManager, VideoBackend};
use crate::config::ReceiptcamConfig;
use crate::error::Result;
use crate::events::{EventBus, ReceiptcamEvent};
use crate::input::{InputAction, KeyboardInputHandler};
use crate::ocr::OcrEngine;
use crate::pipeline::CapturePipeline;
use crate::ui::{StateMachine, UiState, ViewSink};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[cfg(all(target_os = "linux", feature = "hardware-input"))]
use crate::input::ButtonInputHandler;

/// Main application coordinator.
///
/// Owns the state machine, the camera manager, and the capture pipeline,
/// and is the single consumer of input actions: every action is handled
/// to completion before the next one is taken, so a second capture
/// attempt can never overlap a running one.
pub struct ReceiptcamOrchestrator {
    pub(super) config: ReceiptcamConfig,
    pub(super) event_bus: Arc<EventBus>,
    pub(super) state_machine: StateMachine,
    pub(super) camera: CameraManager,
    pub(super) pipeline: CapturePipeline,
    pub(super) keyboard_handler: Option<KeyboardInputHandler>,
    #[cfg(all(target_os = "linux", feature = "hardware-input"))]
    pub(super) button_handler: Option<ButtonInputHandler>,
    pub(super) cancellation_token: CancellationToken,
}

impl ReceiptcamOrchestrator {
    /// Wire the orchestrator from dependency-injected boundary handles.
    pub fn new(
        config: ReceiptcamConfig,
        backend: Arc<dyn VideoBackend>,
        ocr: Arc<dyn OcrEngine>,
        bridge: Arc<dyn HostBridge>,
        sink: Arc<dyn ViewSink>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::new(config.system.event_bus_capacity));

        let state_machine = StateMachine::new(sink);
        let camera = CameraManager::new(config.camera.clone(), backend);
        let pipeline = CapturePipeline::new(
            ocr,
            bridge,
            Arc::clone(&event_bus),
            config.ocr.clone(),
            config.bridge.clone(),
        );

        let keyboard_handler = config
            .input
            .keyboard
            .then(|| KeyboardInputHandler::new(Arc::clone(&event_bus)));

        #[cfg(all(target_os = "linux", feature = "hardware-input"))]
        let button_handler = Some(ButtonInputHandler::new(
            &config.input,
            Arc::clone(&event_bus),
        ));

        Self {
            config,
            event_bus,
            state_machine,
            camera,
            pipeline,
            keyboard_handler,
            #[cfg(all(target_os = "linux", feature = "hardware-input"))]
            button_handler,
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn config(&self) -> &ReceiptcamConfig {
        &self.config
    }

    /// Start the input handlers.
    pub async fn start(&mut self) -> Result<()> {
        info!("Starting receiptcam components");

        if let Some(keyboard) = &self.keyboard_handler {
            keyboard.start().await?;
        }

        #[cfg(all(target_os = "linux", feature = "hardware-input"))]
        if let Some(buttons) = &self.button_handler {
            buttons.start().await?;
        }

        Ok(())
    }

    /// Subscribe a bus receiver for the run loop.
    pub(super) fn subscribe(&self) -> broadcast::Receiver<ReceiptcamEvent> {
        self.event_bus.subscribe()
    }

    /// Handle one semantic action to completion. Returns `false` when the
    /// action requests shutdown.
    pub(super) async fn handle_action(&mut self, action: InputAction) -> bool {
        debug!("Handling action {:?} in {:?}", action, self.state_machine.current());

        match action {
            InputAction::RequestScan => {
                self.request_scan().await;
            }
            InputAction::TriggerCapture => {
                // Awaited inline: once Processing begins it runs to
                // completion before any other action is consumed.
                if let Err(e) = self
                    .pipeline
                    .capture_and_process(&mut self.state_machine, &mut self.camera)
                    .await
                {
                    warn!("Capture attempt error: {}", e);
                }
            }
            InputAction::ZoomDelta(delta) => {
                self.camera.adjust_zoom(delta).await;
            }
            InputAction::Reset => {
                self.reset().await;
            }
            InputAction::EmailResults => {
                self.pipeline.email_results(&mut self.state_machine).await;
            }
            InputAction::Shutdown => {
                self.reset().await;
                return false;
            }
        }
        true
    }

    /// Enter `Camera` if acquisition succeeds; stay in `Idle` with an
    /// access-error status otherwise.
    pub(super) async fn request_scan(&mut self) {
        if self.state_machine.current() != UiState::Idle {
            debug!("Scan request ignored in {:?}", self.state_machine.current());
            return;
        }

        match self.camera.acquire().await {
            Ok(()) => {
                self.state_machine.enter_camera();
                let _ = self
                    .event_bus
                    .publish(ReceiptcamEvent::StateChanged {
                        from: UiState::Idle,
                        to: UiState::Camera,
                        timestamp: std::time::SystemTime::now(),
                    })
                    .await;
            }
            Err(e) => {
                warn!("Camera acquisition failed: {}", e);
                let _ = self
                    .event_bus
                    .publish(ReceiptcamEvent::SystemError {
                        component: "camera".to_string(),
                        error: e.to_string(),
                    })
                    .await;
                self.state_machine
                    .set_status("Camera access denied. Check permissions");
            }
        }
    }

    /// Release the camera and return the UI to `Idle`.
    pub(super) async fn reset(&mut self) {
        let from = self.state_machine.current();
        self.camera.release().await;
        self.state_machine.reset_to_idle();
        if from != UiState::Idle {
            let _ = self
                .event_bus
                .publish(ReceiptcamEvent::StateChanged {
                    from,
                    to: UiState::Idle,
                    timestamp: std::time::SystemTime::now(),
                })
                .await;
        }
    }

    /// Stop input handlers and release every held resource.
    pub(super) async fn shutdown(&mut self) -> Result<()> {
        info!("Shutting down receiptcam");
        self.cancellation_token.cancel();

        if let Some(keyboard) = &self.keyboard_handler {
            keyboard.stop().await?;
        }

        self.camera.release().await;
        info!("Shutdown complete");
        Ok(())
    }
}
