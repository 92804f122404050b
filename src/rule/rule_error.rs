use std::error::Error;
use std::fmt;

/// Problems with the shape of a rule line. Each variant carries the text it
/// was raised for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
  /// The rule doesn't contain exactly one `>`
  ArrowCount(String),
  /// One side of the arrow is blank
  EmptySide(String),
  /// Source and target lists can't be paired up
  CountMismatch {
    /// The rule text
    rule: String,
    /// Number of source tokens
    source: usize,
    /// Number of target tokens
    target: usize,
  },
  /// More than one `0` on the same side
  MultipleZeros(String),
  /// `$n` pointing outside the source, or with no index at all
  BadBackReference(String),
  /// `$Gn` whose class doesn't line up with the captured macro
  ClassMismatch(String),
  /// A bundle descriptor names a feature or alias the model doesn't know
  UnknownFeature(String),
  /// A source token contains something other than segments, bundles,
  /// macros and `.`
  IllegalSource(String),
}
impl RuleError {
  /// The offending piece of rule text
  #[must_use]
  pub fn text(&self) -> &str {
    match self {
      Self::ArrowCount(s)
      | Self::EmptySide(s)
      | Self::MultipleZeros(s)
      | Self::BadBackReference(s)
      | Self::ClassMismatch(s)
      | Self::UnknownFeature(s)
      | Self::IllegalSource(s) => s,
      Self::CountMismatch { rule, .. } => rule,
    }
  }
}

impl fmt::Display for RuleError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::ArrowCount(rule) =>
        write!(f, "{rule:?} must contain exactly one `>`"),
      Self::EmptySide(rule) =>
        write!(f, "{rule:?} has nothing on one side of `>`, use 0 instead"),
      Self::CountMismatch { rule, source, target } => write!(
        f,
        "{rule:?} maps {source} source tokens onto {target} target tokens"
      ),
      Self::MultipleZeros(side) =>
        write!(f, "{side:?} contains more than one 0"),
      Self::BadBackReference(token) =>
        write!(f, "{token:?} does not refer to a source element"),
      Self::ClassMismatch(token) => write!(
        f,
        "{token:?} must translate a macro into a class of the same size"
      ),
      Self::UnknownFeature(entry) =>
        write!(f, "{entry:?} is not a feature or alias of the model"),
      Self::IllegalSource(token) => write!(
        f,
        "{token:?} may only contain segments, bundles, macros and `.`"
      ),
    }
  }
}
impl Error for RuleError {}
