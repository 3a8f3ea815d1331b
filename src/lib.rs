pub mod app;
pub mod bridge;
pub mod camera;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod ocr;
pub mod pipeline;
pub mod session;
pub mod ui;

pub use app::{ReceiptcamOrchestrator, ShutdownReason};
pub use bridge::{BridgePayload, EmailSendRequest, HostBridge, InterpretationRequest};
pub use camera::{CameraManager, MockVideoBackend, VideoBackend, VideoStream, ZoomRange};
pub use config::ReceiptcamConfig;
pub use error::{ReceiptcamError, Result};
pub use events::{EventBus, ReceiptcamEvent};
pub use input::{route, InputAction, KeyboardInputHandler, RawInput};
pub use ocr::{MockOcrEngine, OcrEngine, UnavailableOcrEngine};
pub use pipeline::CapturePipeline;
pub use session::CaptureSession;
pub use ui::{ConsoleView, StateMachine, UiState, ViewModel, ViewSink};

#[cfg(unix)]
pub use bridge::UnixSocketBridge;

#[cfg(all(target_os = "linux", feature = "camera"))]
pub use camera::GstVideoBackend;

#[cfg(feature = "ocr-tesseract")]
pub use ocr::TesseractOcrEngine;
