//! Tracing setup. Logs go to stderr; stdout is reserved for notifications.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// JSON lines by default; `RUST_LOG_FORMAT=pretty` switches to human-readable
/// output. `RUST_LOG` overrides the INFO default.
pub fn init() {
  let use_json = std::env::var("RUST_LOG_FORMAT")
    .map(|v| v != "pretty")
    .unwrap_or(true);
  let filter = EnvFilter::builder()
    .with_default_directive(Level::INFO.into())
    .from_env_lossy();

  if use_json {
    tracing_subscriber::registry()
      .with(fmt::layer().json().flatten_event(true).with_writer(std::io::stderr))
      .with(filter)
      .init();
  } else {
    tracing_subscriber::registry()
      .with(fmt::layer().with_writer(std::io::stderr))
      .with(filter)
      .init();
  }
}
