use crate::error::EventBusError;
use crate::input::RawInput;
use crate::ui::UiState;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Events that can occur in the receiptcam system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReceiptcamEvent {
    /// A normalized hardware/keyboard input arrived
    InputReceived {
        input: RawInput,
        timestamp: SystemTime,
    },
    /// The UI state machine moved to a new state
    StateChanged {
        from: UiState,
        to: UiState,
        timestamp: SystemTime,
    },
    /// A capture attempt has started
    CaptureStarted { session_id: String },
    /// A capture attempt completed and its session is retained for display
    CaptureCompleted {
        session_id: String,
        text_chars: usize,
    },
    /// A capture attempt failed and was discarded
    CaptureFailed { session_id: String, reason: String },
    /// A payload was handed to the host bridge
    DispatchSubmitted { kind: String },
    /// A system error occurred in a component
    SystemError { component: String, error: String },
    /// System shutdown requested
    ShutdownRequested {
        timestamp: SystemTime,
        reason: String,
    },
}

impl ReceiptcamEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            ReceiptcamEvent::InputReceived { input, .. } => {
                format!("Input received: {:?}", input)
            }
            ReceiptcamEvent::StateChanged { from, to, .. } => {
                format!("State changed: {:?} -> {:?}", from, to)
            }
            ReceiptcamEvent::CaptureStarted { session_id } => {
                format!("Capture started: {}", session_id)
            }
            ReceiptcamEvent::CaptureCompleted {
                session_id,
                text_chars,
            } => {
                format!(
                    "Capture completed: {} ({} chars of text)",
                    session_id, text_chars
                )
            }
            ReceiptcamEvent::CaptureFailed { session_id, reason } => {
                format!("Capture failed: {} ({})", session_id, reason)
            }
            ReceiptcamEvent::DispatchSubmitted { kind } => {
                format!("Dispatch submitted: {}", kind)
            }
            ReceiptcamEvent::SystemError { component, error } => {
                format!("Error in {}: {}", component, error)
            }
            ReceiptcamEvent::ShutdownRequested { reason, .. } => {
                format!("Shutdown requested: {}", reason)
            }
        }
    }

    /// Get the event type as a string for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            ReceiptcamEvent::InputReceived { .. } => "input_received",
            ReceiptcamEvent::StateChanged { .. } => "state_changed",
            ReceiptcamEvent::CaptureStarted { .. } => "capture_started",
            ReceiptcamEvent::CaptureCompleted { .. } => "capture_completed",
            ReceiptcamEvent::CaptureFailed { .. } => "capture_failed",
            ReceiptcamEvent::DispatchSubmitted { .. } => "dispatch_submitted",
            ReceiptcamEvent::SystemError { .. } => "system_error",
            ReceiptcamEvent::ShutdownRequested { .. } => "shutdown_requested",
        }
    }
}

/// Async event bus for component coordination using broadcast channels
pub struct EventBus {
    sender: broadcast::Sender<ReceiptcamEvent>,
    debug_logging: bool,
}

impl EventBus {
    /// Create a new event bus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            debug_logging: false,
        }
    }

    /// Create a new event bus with debug logging enabled
    pub fn with_debug_logging(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            debug_logging: true,
        }
    }

    /// Subscribe to events and get a receiver
    pub fn subscribe(&self) -> broadcast::Receiver<ReceiptcamEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all subscribers
    pub async fn publish(&self, event: ReceiptcamEvent) -> Result<usize, EventBusError> {
        if self.debug_logging {
            debug!("Publishing event: {}", event.description());
        }

        // Log important events at appropriate levels
        match &event {
            ReceiptcamEvent::StateChanged { from, to, .. } => {
                info!("UI state: {:?} -> {:?}", from, to);
            }
            ReceiptcamEvent::CaptureFailed { session_id, reason } => {
                warn!("Capture {} failed: {}", session_id, reason);
            }
            ReceiptcamEvent::SystemError { component, error } => {
                error!("System error in {}: {}", component, error);
            }
            ReceiptcamEvent::ShutdownRequested { reason, .. } => {
                info!("Shutdown requested: {}", reason);
            }
            _ => {
                if self.debug_logging {
                    debug!("Event: {}", event.description());
                }
            }
        }

        self.sender
            .send(event)
            .map_err(|e| EventBusError::PublishFailed {
                details: e.to_string(),
            })
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Check if there are any active subscribers
    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            debug_logging: self.debug_logging,
        }
    }
}
