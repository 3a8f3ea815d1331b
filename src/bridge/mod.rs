mod payload;
mod transport;
#[cfg(test)]
mod tests;

pub use payload::{jpeg_data_uri, BridgePayload, EmailSendRequest, InterpretationRequest};
pub use transport::RecordingBridge;
#[cfg(unix)]
pub use transport::UnixSocketBridge;

use crate::error::BridgeError;
use async_trait::async_trait;

/// One-way outbound messaging channel to the host.
///
/// `post` resolves when the serialized payload has been handed to the
/// transport. No response is awaited or modeled anywhere; absence of the
/// bridge is a failure for the call that needs it, never a crash.
#[async_trait]
pub trait HostBridge: Send + Sync {
    async fn post(&self, payload: &BridgePayload) -> Result<(), BridgeError>;
}
