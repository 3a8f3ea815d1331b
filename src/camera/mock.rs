use super::backend::{StillImage, StreamRequest, VideoBackend, VideoStream, ZoomRange};
use crate::error::CameraError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Deterministic in-memory backend for development hosts without a camera
/// stack, and for tests. Records every call it receives so resource
/// discipline can be asserted.
pub struct MockVideoBackend {
    deny_access: bool,
    zoom_range: Option<ZoomRange>,
    native_still: bool,
    fail_capture: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockVideoBackend {
    pub fn new() -> Self {
        Self {
            deny_access: false,
            zoom_range: Some(ZoomRange { min: 1.0, max: 3.0 }),
            native_still: true,
            fail_capture: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Simulate a camera without zoom capability.
    pub fn without_zoom(mut self) -> Self {
        self.zoom_range = None;
        self
    }

    /// Simulate an environment without a hardware still-capture call.
    pub fn without_native_still(mut self) -> Self {
        self.native_still = false;
        self
    }

    /// Simulate denied camera permission.
    pub fn denying_access(mut self) -> Self {
        self.deny_access = true;
        self
    }

    /// Simulate a stream whose still captures fail.
    pub fn failing_capture(mut self) -> Self {
        self.fail_capture = true;
        self
    }

    /// Snapshot of all backend and stream calls so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl Default for MockVideoBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoBackend for MockVideoBackend {
    async fn open(&self, request: &StreamRequest) -> Result<Box<dyn VideoStream>, CameraError> {
        self.calls.lock().push("open".to_string());

        if self.deny_access {
            return Err(CameraError::AcquisitionDenied {
                details: "mock backend denies camera access".to_string(),
            });
        }

        debug!(
            "Mock stream opened ({}x{} @ {}fps)",
            request.resolution.0, request.resolution.1, request.fps
        );

        Ok(Box::new(MockVideoStream {
            resolution: request.resolution,
            zoom_range: self.zoom_range,
            native_still: self.native_still,
            fail_capture: self.fail_capture,
            stopped: false,
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct MockVideoStream {
    resolution: (u32, u32),
    zoom_range: Option<ZoomRange>,
    native_still: bool,
    fail_capture: bool,
    stopped: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockVideoStream {
    fn synth_jpeg(width: u32, height: u32) -> Result<Vec<u8>, CameraError> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 200, 200]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageOutputFormat::Jpeg(80))
            .map_err(|e| CameraError::Stream {
                details: format!("failed to encode synthetic frame: {}", e),
            })?;
        Ok(buf.into_inner())
    }
}

#[async_trait]
impl VideoStream for MockVideoStream {
    fn zoom_range(&self) -> Option<ZoomRange> {
        self.zoom_range
    }

    async fn apply_zoom(&mut self, level: f64) -> Result<(), CameraError> {
        self.calls.lock().push(format!("zoom({:.2})", level));
        Ok(())
    }

    fn supports_native_still(&self) -> bool {
        self.native_still
    }

    async fn capture_still_native(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<StillImage, CameraError> {
        self.calls.lock().push("still_native".to_string());
        if self.fail_capture {
            return Err(CameraError::CaptureUnavailable {
                details: "mock native still failure".to_string(),
            });
        }
        Ok(StillImage {
            jpeg: Self::synth_jpeg(width, height)?,
        })
    }

    async fn capture_frame(&mut self) -> Result<StillImage, CameraError> {
        self.calls.lock().push("capture_frame".to_string());
        if self.fail_capture {
            return Err(CameraError::Stream {
                details: "mock frame capture failure".to_string(),
            });
        }
        Ok(StillImage {
            jpeg: Self::synth_jpeg(self.resolution.0, self.resolution.1)?,
        })
    }

    async fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.calls.lock().push("stop".to_string());
        }
    }
}
