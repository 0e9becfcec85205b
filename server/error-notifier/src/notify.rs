//! Outbound notification capability.

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;

use crate::error::SendError;

/// Anything that can deliver one subject + body. Single attempt, no retry.
pub trait Notifier {
  fn send(&self, subject: &str, body: &str) -> Result<(), SendError>;
}

/// Wire form of one published notification.
#[derive(Debug, Serialize)]
struct Publication<'a> {
  target: &'a str,
  subject: &'a str,
  message: &'a str,
}

/// Writes each notification as one JSON line for a bus relay to publish.
pub struct StreamNotifier<W: Write> {
  target: String,
  out: Mutex<W>,
}

impl<W: Write> StreamNotifier<W> {
  pub fn new(target: impl Into<String>, out: W) -> Self {
    Self {
      target: target.into(),
      out: Mutex::new(out),
    }
  }

  pub fn target(&self) -> &str {
    &self.target
  }

  pub fn into_inner(self) -> W {
    self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl<W: Write> Notifier for StreamNotifier<W> {
  fn send(&self, subject: &str, body: &str) -> Result<(), SendError> {
    let publication = Publication {
      target: &self.target,
      subject,
      message: body,
    };
    let mut out = self
      .out
      .lock()
      .map_err(|_| SendError::transport("output stream lock poisoned"))?;
    serde_json::to_writer(&mut *out, &publication)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
  }
}
