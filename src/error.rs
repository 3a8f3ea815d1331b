use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiptcamError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Event bus error: {0}")]
    EventBus(#[from] EventBusError),

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

impl ReceiptcamError {
    pub fn component<S: Into<String>>(component: S, message: S) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Camera acquisition and still-capture failures.
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Camera access denied or unavailable: {details}")]
    AcquisitionDenied { details: String },

    #[error("No still-capture path available: {details}")]
    CaptureUnavailable { details: String },

    #[error("Camera stream error: {details}")]
    Stream { details: String },
}

/// Text-recognition failures at the OCR boundary.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR engine is not loaded: {details}")]
    EngineMissing { details: String },

    #[error("Text recognition failed: {details}")]
    Recognition { details: String },
}

/// Event bus failures.
#[derive(Error, Debug)]
pub enum EventBusError {
    #[error("Failed to publish event: {details}")]
    PublishFailed { details: String },

    #[error("Event channel closed")]
    Closed,
}

/// Outbound host-bridge failures.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Host bridge unavailable: {details}")]
    Unavailable { details: String },

    #[error("Failed to encode bridge payload: {details}")]
    Encode { details: String },
}

pub type Result<T> = std::result::Result<T, ReceiptcamError>;
