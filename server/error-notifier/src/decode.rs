//! Decode an inbound batch: base64 -> gzip -> JSON.

use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::error::{DecodeError, DecodeStage};
use crate::types::{InvocationEvent, LogBatch, LogBatchPayload};

/// Decode the batch carried by an invocation envelope.
pub fn decode_invocation(event: &InvocationEvent) -> Result<LogBatch, DecodeError> {
  debug!(data = %event.awslogs.data, "raw batch");
  decode(event.awslogs.data.as_bytes())
}

/// Decode one opaque batch. Any stage failure rejects the whole batch.
///
/// Bytes outside the base64 alphabet (line wrapping, stray whitespace) are
/// skipped before decoding. Every gzip member is read, not just the first.
pub fn decode(raw: &[u8]) -> Result<LogBatch, DecodeError> {
  let compressed = STANDARD
    .decode(base64_symbols(raw))
    .map_err(|e| DecodeError::new(DecodeStage::Base64, e))?;

  let mut json = Vec::new();
  MultiGzDecoder::new(compressed.as_slice())
    .read_to_end(&mut json)
    .map_err(|e| DecodeError::new(DecodeStage::Decompress, e))?;

  let payload: LogBatchPayload =
    serde_json::from_slice(&json).map_err(|e| DecodeError::new(DecodeStage::Parse, e))?;

  let batch = LogBatch::from(payload);
  debug!(
    log_group = %batch.source_id,
    log_stream = %batch.stream_id,
    resource_path = %batch.resource_path(),
    message_type = batch.message_type.as_deref().unwrap_or("-"),
    owner = batch.owner.as_deref().unwrap_or("-"),
    events = batch.events.len(),
    "decoded batch"
  );
  Ok(batch)
}

fn base64_symbols(raw: &[u8]) -> Vec<u8> {
  raw
    .iter()
    .copied()
    .filter(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use flate2::write::GzEncoder;
  use flate2::Compression;
  use std::io::Write;

  fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
  }

  fn encode(json: &str) -> String {
    STANDARD.encode(gzip(json.as_bytes()))
  }

  #[test]
  fn decodes_well_formed_batch() {
    let raw = encode(
      r#"{
        "messageType": "DATA_MESSAGE",
        "owner": "123456789012",
        "logGroup": "/aws/lambda/checkout",
        "logStream": "2025/01/15/[$LATEST]abc",
        "subscriptionFilters": ["errors"],
        "logEvents": [
          {"id": "1", "timestamp": 1736937000000, "message": "first\n"},
          {"id": "2", "timestamp": 1736937000001, "message": "second\n", "extractedFields": {}}
        ]
      }"#,
    );
    let batch = decode(raw.as_bytes()).unwrap();
    assert_eq!(batch.source_id, "/aws/lambda/checkout");
    assert_eq!(batch.stream_id, "2025/01/15/[$LATEST]abc");
    assert_eq!(batch.owner.as_deref(), Some("123456789012"));
    assert_eq!(batch.subscription_filters, ["errors"]);
    let messages: Vec<_> = batch.events.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, ["first\n", "second\n"]);
    assert_eq!(batch.events[1].id.as_deref(), Some("2"));
  }

  #[test]
  fn reads_every_gzip_member() {
    let json = r#"{"logGroup": "/aws/lambda/x", "logStream": "s", "logEvents": [{"message": "boom"}]}"#;
    let (head, tail) = json.split_at(29);
    let mut compressed = gzip(head.as_bytes());
    compressed.extend(gzip(tail.as_bytes()));

    let batch = decode(STANDARD.encode(compressed).as_bytes()).unwrap();
    assert_eq!(batch.source_id, "/aws/lambda/x");
    assert_eq!(batch.events, [crate::types::LogEvent::new("boom")]);
  }

  #[test]
  fn line_wrapped_base64_is_accepted() {
    let raw = encode(r#"{"logGroup": "g", "logStream": "s", "logEvents": [{"message": "m"}]}"#);
    let wrapped: String = raw
      .as_bytes()
      .chunks(20)
      .map(|c| format!("{}\r\n", std::str::from_utf8(c).unwrap()))
      .collect();
    let batch = decode(format!("  {} ", wrapped).as_bytes()).unwrap();
    assert_eq!(batch.events[0].message, "m");
  }

  #[test]
  fn bad_base64_fails_at_base64_stage() {
    let err = decode(b"not base64!!").unwrap_err();
    assert_eq!(err.stage, DecodeStage::Base64);
  }

  #[test]
  fn non_gzip_fails_at_decompress_stage() {
    let raw = STANDARD.encode(b"{\"logGroup\": \"plain json\"}");
    let err = decode(raw.as_bytes()).unwrap_err();
    assert_eq!(err.stage, DecodeStage::Decompress);
    assert!(err.to_string().starts_with("decode: decompress:"));
  }

  #[test]
  fn schema_mismatch_fails_at_parse_stage() {
    let raw = encode(r#"{"logGroup": "/aws/lambda/x", "logEvents": []}"#);
    let err = decode(raw.as_bytes()).unwrap_err();
    assert_eq!(err.stage, DecodeStage::Parse);
    assert!(err.cause.contains("logStream"));
  }

  #[test]
  fn event_without_message_is_rejected() {
    let raw = encode(r#"{"logGroup": "g", "logStream": "s", "logEvents": [{"id": "1"}]}"#);
    assert_eq!(decode(raw.as_bytes()).unwrap_err().stage, DecodeStage::Parse);
  }
}
