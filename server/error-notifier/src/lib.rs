//! Lambda Error Notifier: filters a log batch down to real errors and sends one summary.
//!
//! One invocation handles one batch: decode (base64 -> gzip -> JSON), drop
//! events whose message contains an exclusion pattern, and if anything is
//! left, publish a single formatted notification.
//!
//! Stateless; no DB, no queue, no retries.

pub mod config;
pub mod decode;
pub mod error;
pub mod logging;
pub mod notify;
pub mod rules;
pub mod summarize;
pub mod types;

pub use config::Config;
pub use decode::{decode, decode_invocation};
pub use error::{ConfigError, DecodeError, DecodeStage, NotifierError, SendError};
pub use notify::{Notifier, StreamNotifier};
pub use rules::ExclusionRuleSet;
pub use summarize::Summarizer;
pub use types::{InvocationEvent, LogBatch, LogEvent, NotificationDraft, SummaryOutcome, SummaryReport};

use std::io::{Read, Write};

use tracing::{debug, error};

/// Run one invocation end to end.
///
/// Decode failures are fatal. A failed send is logged and absorbed: the
/// invocation still succeeds and `Ok(None)` is returned.
pub fn handle(
  event: &InvocationEvent,
  config: &Config,
  notifier: &dyn Notifier,
) -> Result<Option<SummaryReport>, NotifierError> {
  let batch = decode_invocation(event)?;
  let summarizer = Summarizer::new(config.rules.clone());

  match summarizer.summarize(&batch, notifier) {
    Ok(report) => Ok(Some(report)),
    Err(e) => {
      error!(log_group = %batch.source_id, "An error occurred: {}", e);
      Ok(None)
    }
  }
}

/// Resolve configuration, read one envelope from `input`, publish to `output`.
///
/// Configuration is resolved before `input` is read.
pub fn run<F, R, W>(lookup: F, mut input: R, output: W) -> Result<Option<SummaryReport>, NotifierError>
where
  F: Fn(&str) -> Option<String>,
  R: Read,
  W: Write,
{
  let config = Config::from_lookup(lookup)?;

  let mut raw = String::new();
  input.read_to_string(&mut raw)?;
  let event: InvocationEvent = serde_json::from_str(&raw)?;

  let notifier = StreamNotifier::new(config.notification_target.clone(), output);
  debug!(
    notification_target = notifier.target(),
    patterns = config.rules.patterns().len(),
    "invocation configured"
  );
  handle(&event, &config, &notifier)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;
  use std::io;

  struct WatchedInput<'a> {
    read: &'a Cell<bool>,
  }

  impl Read for WatchedInput<'_> {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
      self.read.set(true);
      Ok(0)
    }
  }

  struct BrokenInput;

  impl Read for BrokenInput {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
      Err(io::Error::new(io::ErrorKind::ConnectionReset, "stdin closed"))
    }
  }

  fn target_only(name: &str) -> Option<String> {
    (name == "snsARN").then(|| "arn:aws:sns:eu-west-1:1:alerts".to_string())
  }

  #[test]
  fn missing_config_fails_before_input_is_read() {
    let read = Cell::new(false);
    let err = run(|_| None, WatchedInput { read: &read }, Vec::new()).unwrap_err();
    assert!(matches!(err, NotifierError::Config(ConfigError::MissingTarget(_))));
    assert!(!read.get());
  }

  #[test]
  fn input_failure_is_reported_as_io() {
    let err = run(target_only, BrokenInput, Vec::new()).unwrap_err();
    assert!(matches!(err, NotifierError::Io(_)));
    assert!(err.to_string().starts_with("input:"));
  }

  #[test]
  fn malformed_envelope_is_reported_as_envelope() {
    let err = run(target_only, r#"{"records": []}"#.as_bytes(), Vec::new()).unwrap_err();
    assert!(matches!(err, NotifierError::Envelope(_)));
  }
}
