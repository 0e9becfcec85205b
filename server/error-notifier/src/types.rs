//! Core types for the error notifier (JSON contracts + internal models).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: what the platform delivers)
// ---------------------------------------------------------------------------

/// One invocation envelope. The batch itself is the opaque string at `awslogs.data`.
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationEvent {
  pub awslogs: AwsLogsData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsLogsData {
  pub data: String,
}

/// Decompressed batch document. Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBatchPayload {
  pub log_group: String,
  pub log_stream: String,
  pub log_events: Vec<InboundLogEvent>,
  #[serde(default)]
  pub owner: Option<String>,
  #[serde(default)]
  pub message_type: Option<String>,
  #[serde(default)]
  pub subscription_filters: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundLogEvent {
  pub message: String,
  #[serde(default)]
  pub id: Option<String>,
  /// Epoch milliseconds.
  #[serde(default)]
  pub timestamp: Option<i64>,
}

// ---------------------------------------------------------------------------
// Internal models
// ---------------------------------------------------------------------------

/// A decoded batch. Events keep their ingestion order.
#[derive(Debug, Clone)]
pub struct LogBatch {
  pub source_id: String,
  pub stream_id: String,
  pub events: Vec<LogEvent>,
  pub owner: Option<String>,
  pub message_type: Option<String>,
  pub subscription_filters: Vec<String>,
}

impl LogBatch {
  /// `source_id` split on `/`, empty segments included.
  pub fn resource_path(&self) -> ResourcePath {
    ResourcePath(self.source_id.split('/').map(str::to_string).collect())
  }
}

impl From<LogBatchPayload> for LogBatch {
  fn from(payload: LogBatchPayload) -> Self {
    Self {
      source_id: payload.log_group,
      stream_id: payload.log_stream,
      events: payload.log_events.into_iter().map(LogEvent::from).collect(),
      owner: payload.owner,
      message_type: payload.message_type,
      subscription_filters: payload.subscription_filters,
    }
  }
}

/// One log line. `id` and `timestamp` are passthrough metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
  pub message: String,
  pub id: Option<String>,
  pub timestamp: Option<i64>,
}

impl LogEvent {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      id: None,
      timestamp: None,
    }
  }

  pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
    self.timestamp.and_then(DateTime::<Utc>::from_timestamp_millis)
  }
}

impl From<InboundLogEvent> for LogEvent {
  fn from(raw: InboundLogEvent) -> Self {
    Self {
      message: raw.message,
      id: raw.id,
      timestamp: raw.timestamp,
    }
  }
}

// ---------------------------------------------------------------------------
// Resource path
// ---------------------------------------------------------------------------

/// Split segments of a log group name.
///
/// Displays as a list literal, e.g. `['', 'aws', 'lambda', 'checkout']`, which
/// is the form used in notification subjects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath(pub Vec<String>);

impl ResourcePath {
  pub fn segments(&self) -> &[String] {
    &self.0
  }
}

impl fmt::Display for ResourcePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("[")?;
    for (i, segment) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      write_quoted(f, segment)?;
    }
    f.write_str("]")
  }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
  let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
  write!(f, "{}", quote)?;
  for c in s.chars() {
    match c {
      '\\' => f.write_str("\\\\")?,
      '\n' => f.write_str("\\n")?,
      '\r' => f.write_str("\\r")?,
      '\t' => f.write_str("\\t")?,
      c if c == quote => write!(f, "\\{}", c)?,
      c if c.is_control() => match c as u32 {
        n @ 0..=0xff => write!(f, "\\x{:02x}", n)?,
        n => write!(f, "\\u{:04x}", n)?,
      },
      c => write!(f, "{}", c)?,
    }
  }
  write!(f, "{}", quote)
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Subject + body handed to the notifier. Lives only for one send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationDraft {
  pub subject: String,
  pub body: String,
}

impl NotificationDraft {
  /// Stable id over subject + body; identical drafts share an id.
  pub fn id(&self) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(self.subject.as_bytes());
    hasher.update(b"|");
    hasher.update(self.body.as_bytes());
    let hex = hasher.finalize().to_hex();
    format!("ntf-{}", &hex[..16])
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryOutcome {
  /// Every event matched an exclusion pattern; nothing was sent.
  Suppressed,
  Sent,
}

/// What the summarizer did with one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
  pub outcome: SummaryOutcome,
  pub total: usize,
  pub excluded: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notification_id: Option<String>,
}
