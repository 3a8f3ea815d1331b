use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request that the host run the receipt through its interpretation
/// channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationRequest {
    /// Flags LLM-use intent to the host
    pub use_llm: bool,
    /// Natural-language instruction for the interpreter
    pub instruction: String,
    /// Self-contained embeddable image representation (data URI)
    pub image: String,
    /// Text extracted by local OCR; may be empty
    pub extracted_text: String,
    pub captured_at: DateTime<Utc>,
}

/// Request that the host send an email on the user's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailSendRequest {
    pub subject: String,
    pub body: String,
}

/// The two payload shapes accepted by the host bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgePayload {
    Interpretation(InterpretationRequest),
    EmailSend(EmailSendRequest),
}

impl BridgePayload {
    pub fn kind(&self) -> &'static str {
        match self {
            BridgePayload::Interpretation(_) => "interpretation",
            BridgePayload::EmailSend(_) => "email_send",
        }
    }
}

/// Encode a JPEG still as a self-contained data URI for embedding in an
/// outbound payload.
pub fn jpeg_data_uri(jpeg: &[u8]) -> String {
    format!(
        "data:image/jpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(jpeg)
    )
}
