use super::*;
use chrono::Utc;

fn interpretation_payload() -> BridgePayload {
    BridgePayload::Interpretation(InterpretationRequest {
        use_llm: true,
        instruction: "Interpret this receipt".to_string(),
        image: jpeg_data_uri(&[0xFF, 0xD8, 0xFF, 0xD9]),
        extracted_text: "Coffee Shop — $4.50".to_string(),
        captured_at: Utc::now(),
    })
}

#[test]
fn test_interpretation_payload_shape() {
    let json = serde_json::to_value(interpretation_payload()).unwrap();

    assert_eq!(json["type"], "interpretation");
    assert_eq!(json["use_llm"], true);
    assert_eq!(json["extracted_text"], "Coffee Shop — $4.50");
    assert!(json["image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
}

#[test]
fn test_email_payload_shape() {
    let payload = BridgePayload::EmailSend(EmailSendRequest {
        subject: "Scanned receipt".to_string(),
        body: "Coffee Shop — $4.50".to_string(),
    });
    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(json["type"], "email_send");
    assert_eq!(json["subject"], "Scanned receipt");
    assert_eq!(json["body"], "Coffee Shop — $4.50");
    assert_eq!(payload.kind(), "email_send");
}

#[test]
fn test_data_uri_roundtrip() {
    use base64::Engine as _;

    let bytes = vec![1u8, 2, 3, 4, 5];
    let uri = jpeg_data_uri(&bytes);
    let encoded = uri.strip_prefix("data:image/jpeg;base64,").unwrap();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    assert_eq!(decoded, bytes);
}

#[tokio::test]
async fn test_recording_bridge_posts_in_order() {
    let bridge = RecordingBridge::new();
    bridge.post(&interpretation_payload()).await.unwrap();
    bridge
        .post(&BridgePayload::EmailSend(EmailSendRequest {
            subject: "s".to_string(),
            body: "b".to_string(),
        }))
        .await
        .unwrap();

    let posted = bridge.posted();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0].kind(), "interpretation");
    assert_eq!(posted[1].kind(), "email_send");
}

#[tokio::test]
async fn test_recording_bridge_unavailable() {
    let bridge = RecordingBridge::unavailable();
    let result = bridge.post(&interpretation_payload()).await;
    assert!(matches!(
        result,
        Err(crate::error::BridgeError::Unavailable { .. })
    ));
    assert!(bridge.posted().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_unix_socket_bridge_missing_socket() {
    let dir = tempfile::tempdir().unwrap();
    let bridge = UnixSocketBridge::new(dir.path().join("missing.sock"));
    let result = bridge.post(&interpretation_payload()).await;
    assert!(matches!(
        result,
        Err(crate::error::BridgeError::Unavailable { .. })
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_unix_socket_bridge_delivers_json_line() {
    use tokio::io::AsyncBufReadExt;

    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("bridge.sock");
    let listener = tokio::net::UnixListener::bind(&socket_path).unwrap();

    let accept = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = tokio::io::BufReader::new(stream).lines();
        lines.next_line().await.unwrap().unwrap()
    });

    let bridge = UnixSocketBridge::new(&socket_path);
    bridge.post(&interpretation_payload()).await.unwrap();

    let line = accept.await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(json["type"], "interpretation");
    assert_eq!(json["extracted_text"], "Coffee Shop — $4.50");
}
