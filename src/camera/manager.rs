use super::backend::{StillImage, StreamRequest, VideoBackend, VideoStream, ZoomRange};
use crate::config::CameraConfig;
use crate::error::CameraError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Still-capture strategy, resolved once per capture attempt from a
/// capability check on the active stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StillPath {
    /// Hardware-native still-capture call
    Native,
    /// Generic capture of the current preview frame
    Frame,
}

struct ZoomState {
    range: ZoomRange,
    level: f64,
}

/// The one live camera resource plus its zoom capability.
struct ActiveCamera {
    stream: Box<dyn VideoStream>,
    zoom: Option<ZoomState>,
}

/// Owns the lifecycle of the video stream.
///
/// At most one resource is live at a time and no other component holds a
/// reference to it; everything goes through these operations. `acquire`
/// and `release` are idempotent, and `adjust_zoom` is a pure side effect
/// that never fails.
pub struct CameraManager {
    config: CameraConfig,
    backend: Arc<dyn VideoBackend>,
    active: Option<ActiveCamera>,
    hardware_requests: u64,
}

impl CameraManager {
    pub fn new(config: CameraConfig, backend: Arc<dyn VideoBackend>) -> Self {
        Self {
            config,
            backend,
            active: None,
            hardware_requests: 0,
        }
    }

    /// Whether a camera resource is currently held.
    pub fn is_held(&self) -> bool {
        self.active.is_some()
    }

    /// Current zoom level, when a resource is held and zoom is supported.
    pub fn zoom_level(&self) -> Option<f64> {
        self.active
            .as_ref()
            .and_then(|a| a.zoom.as_ref())
            .map(|z| z.level)
    }

    /// Number of hardware open requests issued so far.
    pub fn hardware_requests(&self) -> u64 {
        self.hardware_requests
    }

    /// Acquire the rear-facing stream and bind it for preview.
    ///
    /// Idempotent: if a resource is already held this returns immediately
    /// without a second hardware request. On failure no partial state is
    /// retained.
    pub async fn acquire(&mut self) -> Result<(), CameraError> {
        if self.active.is_some() {
            debug!("Camera already acquired; skipping hardware request");
            return Ok(());
        }

        let request = StreamRequest {
            device_index: self.config.index,
            resolution: self.config.resolution,
            fps: self.config.fps,
        };

        info!(
            "Acquiring camera {} ({}x{} @ {}fps)",
            request.device_index, request.resolution.0, request.resolution.1, request.fps
        );
        self.hardware_requests += 1;

        let mut stream = self.backend.open(&request).await?;

        // Zoom starts at the capability minimum on every (re)acquisition.
        let zoom = match stream.zoom_range() {
            Some(range) => {
                if let Err(e) = stream.apply_zoom(range.min).await {
                    warn!("Failed to apply initial zoom: {}", e);
                }
                Some(ZoomState {
                    range,
                    level: range.min,
                })
            }
            None => {
                debug!("Camera does not support zoom");
                None
            }
        };

        self.active = Some(ActiveCamera { stream, zoom });
        info!("Camera acquired");
        Ok(())
    }

    /// Stop all tracks and clear every held reference. Idempotent.
    pub async fn release(&mut self) {
        match self.active.take() {
            Some(mut active) => {
                active.stream.stop().await;
                info!("Camera released");
            }
            None => {
                debug!("Camera release requested with no resource held");
            }
        }
    }

    /// Nudge the zoom by `delta` notches, clamped to the capability range.
    ///
    /// No-op when no resource is held or zoom is unsupported. Side effect
    /// only; an apply failure is logged, never surfaced.
    pub async fn adjust_zoom(&mut self, delta: i32) {
        let Some(active) = self.active.as_mut() else {
            debug!("Zoom adjust ignored: no camera held");
            return;
        };
        let Some(zoom) = active.zoom.as_mut() else {
            debug!("Zoom adjust ignored: zoom unsupported");
            return;
        };

        let target = zoom
            .range
            .clamp(zoom.level + f64::from(delta) * self.config.zoom_step);
        if (target - zoom.level).abs() < f64::EPSILON {
            return;
        }

        match active.stream.apply_zoom(target).await {
            Ok(()) => {
                debug!("Zoom {} -> {}", zoom.level, target);
                zoom.level = target;
            }
            Err(e) => warn!("Failed to apply zoom {}: {}", target, e),
        }
    }

    /// Capture one still from the held stream.
    ///
    /// Prefers the hardware-native path when the stream exposes one,
    /// otherwise falls back to a generic frame grab. Exactly one path
    /// executes per attempt.
    pub async fn take_still(&mut self) -> Result<StillImage, CameraError> {
        let Some(active) = self.active.as_mut() else {
            return Err(CameraError::CaptureUnavailable {
                details: "no camera resource held".to_string(),
            });
        };

        let path = if active.stream.supports_native_still() {
            StillPath::Native
        } else {
            StillPath::Frame
        };
        debug!("Still capture via {:?} path", path);

        let (width, height) = self.config.still_resolution;
        match path {
            StillPath::Native => active.stream.capture_still_native(width, height).await,
            StillPath::Frame => active.stream.capture_frame().await,
        }
    }
}
