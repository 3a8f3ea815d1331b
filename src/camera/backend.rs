use crate::error::CameraError;
use async_trait::async_trait;

/// Zoom bounds reported by an active stream's capability query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    /// Clamp a requested level into these bounds.
    pub fn clamp(&self, level: f64) -> f64 {
        level.clamp(self.min, self.max)
    }
}

/// Parameters for opening the rear-facing preview stream.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub device_index: u32,
    pub resolution: (u32, u32),
    pub fps: u32,
}

/// Raw still payload returned by either capture path, JPEG-encoded.
#[derive(Debug, Clone)]
pub struct StillImage {
    pub jpeg: Vec<u8>,
}

/// Platform boundary for video acquisition.
///
/// A backend hands out at most one live stream per open request; exclusive
/// ownership of the returned stream rests with the caller.
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Request a rear-facing video stream and bind it for live preview.
    async fn open(&self, request: &StreamRequest) -> Result<Box<dyn VideoStream>, CameraError>;
}

/// An exclusively-owned live video stream.
#[async_trait]
pub trait VideoStream: Send {
    /// Zoom bounds, when the hardware supports zoom.
    fn zoom_range(&self) -> Option<ZoomRange>;

    /// Apply an absolute zoom level. The caller guarantees the level is
    /// already clamped into the reported range.
    async fn apply_zoom(&mut self, level: f64) -> Result<(), CameraError>;

    /// Whether a hardware-native still-capture call is available.
    fn supports_native_still(&self) -> bool;

    /// Hardware-native still capture at the requested target size.
    async fn capture_still_native(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<StillImage, CameraError>;

    /// Generic software still capture from the live stream.
    async fn capture_frame(&mut self) -> Result<StillImage, CameraError>;

    /// Stop all underlying tracks and detach the preview binding. Idempotent.
    async fn stop(&mut self);
}
