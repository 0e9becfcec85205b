//! Structured error types for the error notifier.

use std::fmt;

use thiserror::Error;

/// Which decode stage rejected the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
  Base64,
  Decompress,
  Parse,
}

impl fmt::Display for DecodeStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Base64 => "base64",
      Self::Decompress => "decompress",
      Self::Parse => "parse",
    };
    f.write_str(name)
  }
}

/// A batch that could not be turned into a `LogBatch`. Fatal for the invocation.
#[derive(Debug, Error)]
#[error("decode: {stage}: {cause}")]
pub struct DecodeError {
  pub stage: DecodeStage,
  pub cause: String,
}

impl DecodeError {
  pub fn new(stage: DecodeStage, cause: impl fmt::Display) -> Self {
    Self {
      stage,
      cause: cause.to_string(),
    }
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("config: missing required notification target ({0})")]
  MissingTarget(&'static str),
}

/// Notification transport failure. Recoverable: logged and absorbed by the caller.
#[derive(Debug, Error)]
pub enum SendError {
  #[error("send: io: {0}")]
  Io(#[from] std::io::Error),

  #[error("send: encode: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("send: {0}")]
  Transport(String),
}

impl SendError {
  pub fn transport(msg: impl Into<String>) -> Self {
    Self::Transport(msg.into())
  }
}

/// Failures that end an invocation. Send failures never surface here.
#[derive(Debug, Error)]
pub enum NotifierError {
  #[error(transparent)]
  Decode(#[from] DecodeError),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("envelope: {0}")]
  Envelope(#[from] serde_json::Error),

  #[error("input: {0}")]
  Io(#[from] std::io::Error),
}
