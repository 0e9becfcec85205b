//! Per-invocation configuration, resolved once from the environment.

use crate::error::ConfigError;
use crate::rules::ExclusionRuleSet;

/// Optional comma-separated list overriding the default exclusion patterns.
pub const EXCLUSION_PATTERNS_VAR: &str = "EXCLUSION_PATTERNS";
/// Required notification target (topic ARN or equivalent endpoint id).
pub const NOTIFICATION_TARGET_VAR: &str = "snsARN";

#[derive(Debug, Clone)]
pub struct Config {
  /// Substrings that mark a log line as noise.
  pub rules: ExclusionRuleSet,
  /// Where notifications are addressed.
  pub notification_target: String,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Build from any variable lookup. A blank target counts as missing.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let notification_target = lookup(NOTIFICATION_TARGET_VAR)
      .filter(|v| !v.trim().is_empty())
      .ok_or(ConfigError::MissingTarget(NOTIFICATION_TARGET_VAR))?;
    let rules = ExclusionRuleSet::from_override(lookup(EXCLUSION_PATTERNS_VAR).as_deref());

    Ok(Self {
      rules,
      notification_target,
    })
  }
}
