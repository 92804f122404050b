//! The single error type surfaced by every compile step. Patterns, rules and
//! segments are validated while they are built; matching itself never fails.

use std::error::Error;
use std::fmt;

use crate::model::ModelError;
use crate::pattern::PatternError;
use crate::rule::RuleError;

/// Which family an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// Malformed environment or pattern text
  Pattern,
  /// Malformed rule text
  Rule,
  /// Segments of different feature models were combined
  Model,
}

/// Any failure while turning text into segments, machines or rules. The
/// caller is expected to report it and abandon the rule it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
  /// See [PatternError]
  Pattern(PatternError),
  /// See [RuleError]
  Rule(RuleError),
  /// See [ModelError]
  Model(ModelError),
}
impl CompileError {
  /// The family of the error
  #[must_use]
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Pattern(_) => ErrorKind::Pattern,
      Self::Rule(_) => ErrorKind::Rule,
      Self::Model(_) => ErrorKind::Model,
    }
  }

  /// The piece of input the error was raised for
  #[must_use]
  pub fn offending_text(&self) -> &str {
    match self {
      Self::Pattern(e) => e.text(),
      Self::Rule(e) => e.text(),
      Self::Model(e) => e.text(),
    }
  }
}

impl fmt::Display for CompileError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Pattern(e) => write!(f, "pattern error: {e}"),
      Self::Rule(e) => write!(f, "rule error: {e}"),
      Self::Model(e) => write!(f, "model error: {e}"),
    }
  }
}
impl Error for CompileError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      Self::Pattern(e) => Some(e),
      Self::Rule(e) => Some(e),
      Self::Model(e) => Some(e),
    }
  }
}

impl From<PatternError> for CompileError {
  fn from(value: PatternError) -> Self { Self::Pattern(value) }
}
impl From<RuleError> for CompileError {
  fn from(value: RuleError) -> Self { Self::Rule(value) }
}
impl From<ModelError> for CompileError {
  fn from(value: ModelError) -> Self { Self::Model(value) }
}

/// Result of any step that parses or combines user-provided text
pub type CompileResult<T> = Result<T, CompileError>;
