use crate::bridge::{jpeg_data_uri, BridgePayload, EmailSendRequest, HostBridge, InterpretationRequest};
use crate::camera::CameraManager;
use crate::config::{BridgeConfig, OcrConfig};
use crate::error::{CameraError, ReceiptcamError, Result};
use crate::events::{EventBus, ReceiptcamEvent};
use crate::ocr::OcrEngine;
use crate::session::CaptureSession;
use crate::ui::{StateMachine, UiState};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Orchestrates one capture attempt: still acquisition, OCR, image
/// embedding, and the outbound interpretation dispatch.
///
/// Single entry point, single exit per attempt, no internal retries. The
/// state machine guard makes a concurrent second attempt impossible:
/// the pipeline only starts from `Camera` and entering `Processing` is
/// its first step.
pub struct CapturePipeline {
    ocr: Arc<dyn OcrEngine>,
    bridge: Arc<dyn HostBridge>,
    event_bus: Arc<EventBus>,
    ocr_config: OcrConfig,
    bridge_config: BridgeConfig,
}

impl CapturePipeline {
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        bridge: Arc<dyn HostBridge>,
        event_bus: Arc<EventBus>,
        ocr_config: OcrConfig,
        bridge_config: BridgeConfig,
    ) -> Self {
        Self {
            ocr,
            bridge,
            event_bus,
            ocr_config,
            bridge_config,
        }
    }

    /// Run one capture attempt to completion.
    ///
    /// A trigger outside `Camera` is a no-op. On success the session is
    /// retained for display in `Results`; on any failure the partial
    /// session is discarded, the camera is released, and the UI is forced
    /// back to `Idle` with a status message.
    pub async fn capture_and_process(
        &self,
        state_machine: &mut StateMachine,
        camera: &mut CameraManager,
    ) -> Result<()> {
        let zoom_level = camera.zoom_level();

        // Entering Processing is the first pipeline step; the preview is
        // hidden by this render before any heavy work begins.
        if !state_machine.enter_processing() {
            return Ok(());
        }
        self.publish_transition(UiState::Camera, UiState::Processing)
            .await;

        let session_id = Uuid::new_v4();
        let _ = self
            .event_bus
            .publish(ReceiptcamEvent::CaptureStarted {
                session_id: session_id.to_string(),
            })
            .await;

        match self.run_attempt(camera, session_id, zoom_level).await {
            Ok(session) => {
                let _ = self
                    .event_bus
                    .publish(ReceiptcamEvent::CaptureCompleted {
                        session_id: session_id.to_string(),
                        text_chars: session.extracted_text.chars().count(),
                    })
                    .await;
                state_machine.enter_results(session);
                self.publish_transition(UiState::Processing, UiState::Results)
                    .await;
                Ok(())
            }
            Err(e) => {
                // No resource may be left held and no stale session shown
                camera.release().await;
                let _ = self
                    .event_bus
                    .publish(ReceiptcamEvent::CaptureFailed {
                        session_id: session_id.to_string(),
                        reason: e.to_string(),
                    })
                    .await;
                state_machine.fail_to_idle(status_for_failure(&e));
                self.publish_transition(UiState::Processing, UiState::Idle)
                    .await;
                Ok(())
            }
        }
    }

    async fn publish_transition(&self, from: UiState, to: UiState) {
        let _ = self
            .event_bus
            .publish(ReceiptcamEvent::StateChanged {
                from,
                to,
                timestamp: std::time::SystemTime::now(),
            })
            .await;
    }

    async fn run_attempt(
        &self,
        camera: &mut CameraManager,
        session_id: Uuid,
        zoom_level: Option<f64>,
    ) -> Result<CaptureSession> {
        // One still per attempt; the manager resolves the hardware-native
        // vs software path from a capability check.
        let still = camera.take_still().await?;

        // Released strictly before recognition starts.
        camera.release().await;

        let (width, height) = probe_still(&still.jpeg)?;
        debug!(
            "Captured still {}x{} ({} bytes)",
            width,
            height,
            still.jpeg.len()
        );

        let extracted_text = self
            .ocr
            .extract_text(&still.jpeg, &self.ocr_config.languages)
            .await?;
        info!(
            "OCR extracted {} chars for session {}",
            extracted_text.chars().count(),
            session_id
        );

        let captured_at = Utc::now();
        let payload = BridgePayload::Interpretation(InterpretationRequest {
            use_llm: true,
            instruction: self.bridge_config.instruction.clone(),
            image: jpeg_data_uri(&still.jpeg),
            extracted_text: extracted_text.clone(),
            captured_at,
        });

        // Fire-and-forget: only the submission matters, no response is
        // awaited or validated.
        self.bridge.post(&payload).await?;
        let _ = self
            .event_bus
            .publish(ReceiptcamEvent::DispatchSubmitted {
                kind: "interpretation".to_string(),
            })
            .await;

        Ok(CaptureSession::new(
            session_id,
            still.jpeg,
            width,
            height,
            extracted_text,
            zoom_level,
        ))
    }

    /// Dispatch the retained session's text through the email-send
    /// channel. Only honored in `Results`; failure surfaces as a status
    /// line and the state is unchanged.
    pub async fn email_results(&self, state_machine: &mut StateMachine) {
        if state_machine.current() != UiState::Results {
            debug!("Email request ignored outside Results");
            return;
        }
        let Some(session) = state_machine.session() else {
            warn!("Results state with no retained session");
            return;
        };

        let payload = BridgePayload::EmailSend(EmailSendRequest {
            subject: self.bridge_config.email_subject.clone(),
            body: session.extracted_text.clone(),
        });

        match self.bridge.post(&payload).await {
            Ok(()) => {
                let _ = self
                    .event_bus
                    .publish(ReceiptcamEvent::DispatchSubmitted {
                        kind: "email_send".to_string(),
                    })
                    .await;
                state_machine.set_status("Receipt emailed");
            }
            Err(e) => {
                warn!("Email dispatch failed: {}", e);
                state_machine.set_status("Could not reach the email service");
            }
        }
    }
}

/// Validate that the still decodes and report its dimensions.
fn probe_still(jpeg: &[u8]) -> Result<(u32, u32)> {
    let decoded = image::load_from_memory(jpeg).map_err(|e| {
        ReceiptcamError::Camera(CameraError::Stream {
            details: format!("captured still does not decode: {}", e),
        })
    })?;
    Ok((decoded.width(), decoded.height()))
}

/// Human-readable status text for a failed attempt.
fn status_for_failure(error: &ReceiptcamError) -> String {
    match error {
        ReceiptcamError::Camera(_) => "Could not capture a photo. Try again".to_string(),
        ReceiptcamError::Ocr(_) => "Could not read the receipt. Try again".to_string(),
        ReceiptcamError::Bridge(_) => "Could not reach the interpretation service".to_string(),
        other => format!("Scan failed: {}", other),
    }
}
