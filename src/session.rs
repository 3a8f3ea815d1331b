use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Transient bundle produced by one capture attempt.
///
/// Created when a capture is triggered, replaced by the next attempt, and
/// discarded on reset. Never persisted.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    /// Attempt identifier, used for event correlation
    pub id: Uuid,
    /// Captured still, JPEG-encoded
    pub image_jpeg: Vec<u8>,
    /// Still dimensions as decoded
    pub width: u32,
    pub height: u32,
    /// Text extracted by the recognition engine; may be empty
    pub extracted_text: String,
    /// Zoom level at capture time, if the camera supported zoom
    pub zoom_level: Option<f64>,
    pub captured_at: DateTime<Utc>,
}

impl CaptureSession {
    pub fn new(
        id: Uuid,
        image_jpeg: Vec<u8>,
        width: u32,
        height: u32,
        extracted_text: String,
        zoom_level: Option<f64>,
    ) -> Self {
        Self {
            id,
            image_jpeg,
            width,
            height,
            extracted_text,
            zoom_level,
            captured_at: Utc::now(),
        }
    }
}
