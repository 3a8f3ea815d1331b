use super::payload::BridgePayload;
use super::HostBridge;
use crate::error::BridgeError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Host bridge over a Unix domain socket carrying JSON lines.
///
/// Connects per post; a missing or refusing socket surfaces as
/// `BridgeError::Unavailable` on the call that needed it.
#[cfg(unix)]
pub struct UnixSocketBridge {
    socket_path: PathBuf,
}

#[cfg(unix)]
impl UnixSocketBridge {
    pub fn new<P: AsRef<Path>>(socket_path: P) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
        }
    }
}

#[cfg(unix)]
#[async_trait]
impl HostBridge for UnixSocketBridge {
    async fn post(&self, payload: &BridgePayload) -> Result<(), BridgeError> {
        use tokio::io::AsyncWriteExt;

        let mut line = serde_json::to_string(payload).map_err(|e| BridgeError::Encode {
            details: e.to_string(),
        })?;
        line.push('\n');

        let mut stream = tokio::net::UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| BridgeError::Unavailable {
                details: format!("{}: {}", self.socket_path.display(), e),
            })?;

        stream
            .write_all(line.as_bytes())
            .await
            .map_err(|e| BridgeError::Unavailable {
                details: format!("write to {} failed: {}", self.socket_path.display(), e),
            })?;

        info!(
            "Posted {} payload to bridge ({} bytes)",
            payload.kind(),
            line.len()
        );
        Ok(())
    }
}

/// In-memory bridge recording every posted payload, for development hosts
/// and tests.
pub struct RecordingBridge {
    unavailable: bool,
    posted: Arc<Mutex<Vec<BridgePayload>>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self {
            unavailable: false,
            posted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Simulate an absent host bridge.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            posted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All payloads posted so far, in order.
    pub fn posted(&self) -> Vec<BridgePayload> {
        self.posted.lock().clone()
    }
}

impl Default for RecordingBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostBridge for RecordingBridge {
    async fn post(&self, payload: &BridgePayload) -> Result<(), BridgeError> {
        if self.unavailable {
            return Err(BridgeError::Unavailable {
                details: "recording bridge configured as absent".to_string(),
            });
        }
        debug!("Recording {} payload", payload.kind());
        self.posted.lock().push(payload.clone());
        Ok(())
    }
}
