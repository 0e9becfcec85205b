//! Exclusion patterns: literal substrings that mark a log line as noise.

/// Patterns used when no override is configured.
pub const DEFAULT_EXCLUSION_PATTERNS: [&str; 2] = ["Rate Exceeded", "request rate is too high"];

/// Ordered list of literal, case-sensitive substring matchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRuleSet {
  patterns: Vec<String>,
}

impl Default for ExclusionRuleSet {
  fn default() -> Self {
    Self::new(DEFAULT_EXCLUSION_PATTERNS)
  }
}

impl ExclusionRuleSet {
  pub fn new<I, S>(patterns: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      patterns: patterns.into_iter().map(Into::into).collect(),
    }
  }

  /// Resolve the rule set from an optional comma-separated override.
  ///
  /// A present, non-empty value replaces the defaults entirely. Entries are
  /// trimmed and otherwise kept as written: no case-folding, no dedup, and an
  /// empty entry (e.g. from `"a,,b"`) stays in the list and matches every line.
  pub fn from_override(raw: Option<&str>) -> Self {
    match raw {
      Some(list) if !list.is_empty() => Self::new(list.split(',').map(str::trim)),
      _ => Self::default(),
    }
  }

  /// First pattern contained in `message`, in rule order.
  pub fn first_match(&self, message: &str) -> Option<&str> {
    self
      .patterns
      .iter()
      .map(String::as_str)
      .find(|pattern| message.contains(pattern))
  }

  pub fn patterns(&self) -> &[String] {
    &self.patterns
  }
}
