//! Binary entrypoint: read one invocation envelope from stdin, publish to stdout.
//!
//! Configuration is read before any input. Notifications are written as JSON
//! lines on stdout for the bus relay; logs go to stderr. Exit status is
//! non-zero only for configuration, input, envelope, or decode failures.

use std::io;

use error_notifier::{logging, run};
use tracing::{error, info};

fn main() {
  logging::init();
  match run(|name| std::env::var(name).ok(), io::stdin().lock(), io::stdout()) {
    Ok(Some(report)) => info!(
      outcome = ?report.outcome,
      total = report.total,
      excluded = report.excluded,
      "batch handled"
    ),
    Ok(None) => {}
    Err(e) => {
      error!("error-notifier: {}", e);
      std::process::exit(1);
    }
  }
}
