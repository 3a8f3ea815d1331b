use super::backend::{StillImage, StreamRequest, VideoBackend, VideoStream, ZoomRange};
use crate::error::CameraError;
use async_trait::async_trait;
use gstreamer::prelude::*;
use gstreamer::Pipeline;
use gstreamer_app::AppSink;
use tracing::{debug, info, warn};

/// GStreamer-based camera backend for Linux devices.
///
/// Opens a v4l2 MJPEG pipeline per acquisition. The pipeline exposes no
/// zoom control and no native still-capture call, so the capability
/// queries report both as unavailable and stills fall back to frame grabs.
pub struct GstVideoBackend;

impl GstVideoBackend {
    pub fn new() -> Result<Self, CameraError> {
        gstreamer::init().map_err(|e| CameraError::AcquisitionDenied {
            details: format!("failed to initialize GStreamer: {}", e),
        })?;
        Ok(Self)
    }

    fn build_pipeline_string(request: &StreamRequest) -> String {
        let (width, height) = request.resolution;
        format!(
            "v4l2src device=/dev/video{} io-mode=mmap do-timestamp=true ! \
             image/jpeg,width={},height={},framerate={}/1 ! \
             queue max-size-buffers=4 leaky=downstream ! \
             appsink name=sink sync=false max-buffers=2 drop=true",
            request.device_index, width, height, request.fps
        )
    }
}

#[async_trait]
impl VideoBackend for GstVideoBackend {
    async fn open(&self, request: &StreamRequest) -> Result<Box<dyn VideoStream>, CameraError> {
        let pipeline_desc = Self::build_pipeline_string(request);
        info!("Creating GStreamer pipeline: {}", pipeline_desc);

        let pipeline = gstreamer::parse::launch(&pipeline_desc)
            .map_err(|e| CameraError::AcquisitionDenied {
                details: format!("failed to create pipeline: {}", e),
            })?
            .downcast::<Pipeline>()
            .map_err(|_| CameraError::AcquisitionDenied {
                details: "failed to downcast to Pipeline".to_string(),
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| CameraError::AcquisitionDenied {
                details: "appsink not found in pipeline".to_string(),
            })?
            .downcast::<AppSink>()
            .map_err(|_| CameraError::AcquisitionDenied {
                details: "failed to downcast to AppSink".to_string(),
            })?;

        pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| CameraError::AcquisitionDenied {
                details: format!("failed to start pipeline: {}", e),
            })?;

        info!("GStreamer pipeline started");
        Ok(Box::new(GstVideoStream {
            pipeline,
            appsink,
            stopped: false,
        }))
    }
}

struct GstVideoStream {
    pipeline: Pipeline,
    appsink: AppSink,
    stopped: bool,
}

#[async_trait]
impl VideoStream for GstVideoStream {
    fn zoom_range(&self) -> Option<ZoomRange> {
        // v4l2 zoom controls are not routed through this pipeline
        None
    }

    async fn apply_zoom(&mut self, level: f64) -> Result<(), CameraError> {
        warn!("Zoom {} requested on a stream without zoom support", level);
        Ok(())
    }

    fn supports_native_still(&self) -> bool {
        false
    }

    async fn capture_still_native(
        &mut self,
        _width: u32,
        _height: u32,
    ) -> Result<StillImage, CameraError> {
        Err(CameraError::CaptureUnavailable {
            details: "GStreamer backend has no native still-capture call".to_string(),
        })
    }

    async fn capture_frame(&mut self) -> Result<StillImage, CameraError> {
        let appsink = self.appsink.clone();
        let sample = tokio::task::spawn_blocking(move || {
            appsink.try_pull_sample(gstreamer::ClockTime::from_seconds(2))
        })
        .await
        .map_err(|e| CameraError::Stream {
            details: format!("frame pull task failed: {}", e),
        })?
        .ok_or_else(|| CameraError::Stream {
            details: "no frame available from pipeline".to_string(),
        })?;

        let buffer = sample.buffer().ok_or_else(|| CameraError::Stream {
            details: "no buffer in sample".to_string(),
        })?;
        let map = buffer.map_readable().map_err(|e| CameraError::Stream {
            details: format!("failed to map buffer: {}", e),
        })?;

        debug!("Captured MJPEG frame ({} bytes)", map.len());
        Ok(StillImage {
            jpeg: map.as_slice().to_vec(),
        })
    }

    async fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!("Failed to stop GStreamer pipeline: {}", e);
        } else {
            debug!("GStreamer pipeline stopped");
        }
    }
}
