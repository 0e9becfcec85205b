//! Core summarizer: drops noisy events, renders one notification, sends it.

use tracing::{debug, info};

use crate::error::SendError;
use crate::notify::Notifier;
use crate::rules::ExclusionRuleSet;
use crate::types::*;

const BANNER: &str = "##########################################################";

/// Characters of an excluded message kept in debug output.
const EXCLUDED_PREVIEW_CHARS: usize = 100;

/// Stateless per-batch summarizer. Safe to reuse across batches.
pub struct Summarizer {
  rules: ExclusionRuleSet,
}

impl Summarizer {
  pub fn new(rules: ExclusionRuleSet) -> Self {
    Self { rules }
  }

  pub fn with_defaults() -> Self {
    Self::new(ExclusionRuleSet::default())
  }

  /// Messages that match no exclusion pattern, in batch order.
  pub fn survivors<'a>(&self, batch: &'a LogBatch) -> Vec<&'a str> {
    batch
      .events
      .iter()
      .filter(|event| match self.rules.first_match(&event.message) {
        Some(pattern) => {
          info!(pattern, "Excluding log entry - matched pattern");
          let preview: String = event.message.chars().take(EXCLUDED_PREVIEW_CHARS).collect();
          debug!(
            excluded = %preview,
            occurred_at = ?event.occurred_at(),
            "Excluded message"
          );
          false
        }
        None => true,
      })
      .map(|event| event.message.as_str())
      .collect()
  }

  /// Filter one batch and, if anything survives, send a single summary.
  ///
  /// Returns `Suppressed` without calling `notifier` when every event is
  /// excluded (including an empty batch). A transport failure is returned
  /// as `SendError` for the caller to log; it is never fatal.
  pub fn summarize(
    &self,
    batch: &LogBatch,
    notifier: &dyn Notifier,
  ) -> Result<SummaryReport, SendError> {
    let survivors = self.survivors(batch);
    let total = batch.events.len();
    let excluded = total - survivors.len();

    let draft = match build_draft(batch, &survivors) {
      Some(d) => d,
      None => {
        info!(total, "All errors matched exclusion patterns - no notification sent");
        return Ok(SummaryReport {
          outcome: SummaryOutcome::Suppressed,
          total,
          excluded,
          notification_id: None,
        });
      }
    };

    let notification_id = draft.id();
    info!(
      notification_id = %notification_id,
      "Sending notification for {} error(s) (excluded {})",
      survivors.len(),
      excluded
    );

    notifier.send(&draft.subject, &draft.body)?;
    info!(notification_id = %notification_id, "Notification sent successfully");

    Ok(SummaryReport {
      outcome: SummaryOutcome::Sent,
      total,
      excluded,
      notification_id: Some(notification_id),
    })
  }
}

/// Render the notification for a batch, or `None` when nothing survived.
///
/// Survivor messages are concatenated with no separator; each keeps its own
/// trailing newline, if it had one.
pub fn build_draft(batch: &LogBatch, survivors: &[&str]) -> Option<NotificationDraft> {
  if survivors.is_empty() {
    return None;
  }
  let filtered_error_msg = survivors.concat();

  let mut body = String::from("\nLambda error summary\n\n");
  body.push_str(BANNER);
  body.push('\n');
  body.push_str(&format!("# LogGroup Name:- {}\n", batch.source_id));
  body.push_str(&format!("# LogStream:- {}\n", batch.stream_id));
  body.push_str("# Log Message:-\n");
  body.push_str(&format!("# \t\t{}\n", filtered_error_msg));
  body.push_str(BANNER);
  body.push('\n');

  Some(NotificationDraft {
    subject: format!("Execution error for Lambda - {}", batch.resource_path()),
    body,
  })
}
