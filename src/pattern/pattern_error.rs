use std::error::Error;
use std::fmt;

/// Syntax errors in environments, patterns and macro definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
  /// A bracket without its pair, or a pair of mismatched kinds
  UnmatchedBracket(String),
  /// A quantifier or `!` with nothing to apply to
  DanglingMetachar(String),
  /// `{}` with no alternatives in it
  EmptyAlternation(String),
  /// `#` carrying a quantifier
  BoundaryQuantified(String),
  /// `#` directly next to another `#`
  AdjacentBoundaries(String),
  /// An environment with other than exactly one `_`
  SeparatorCount(String),
  /// A macro defined in terms of itself
  CyclicMacro(String),
  /// A reference to a macro that was never defined
  UnknownMacro(String),
  /// A definition line not of the form `NAME = alternatives`
  MalformedDefinition(String),
}
impl PatternError {
  /// The offending piece of pattern text
  #[must_use]
  pub fn text(&self) -> &str {
    match self {
      Self::UnmatchedBracket(s)
      | Self::DanglingMetachar(s)
      | Self::EmptyAlternation(s)
      | Self::BoundaryQuantified(s)
      | Self::AdjacentBoundaries(s)
      | Self::SeparatorCount(s)
      | Self::CyclicMacro(s)
      | Self::UnknownMacro(s)
      | Self::MalformedDefinition(s) => s,
    }
  }
}

impl fmt::Display for PatternError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnmatchedBracket(s) =>
        write!(f, "brackets in {s:?} don't pair up"),
      Self::DanglingMetachar(s) =>
        write!(f, "metacharacter in {s:?} has nothing to apply to"),
      Self::EmptyAlternation(s) => write!(f, "{s:?} offers no alternatives"),
      Self::BoundaryQuantified(s) =>
        write!(f, "word boundary in {s:?} cannot take a quantifier"),
      Self::AdjacentBoundaries(s) =>
        write!(f, "word boundaries in {s:?} cannot follow each other"),
      Self::SeparatorCount(s) =>
        write!(f, "environment {s:?} must contain exactly one `_`"),
      Self::CyclicMacro(s) => write!(f, "macro {s:?} refers to itself"),
      Self::UnknownMacro(s) => write!(f, "macro {s:?} is not defined"),
      Self::MalformedDefinition(s) =>
        write!(f, "{s:?} is not of the form `NAME = alternatives`"),
    }
  }
}
impl Error for PatternError {}
