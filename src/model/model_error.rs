use std::error::Error;
use std::fmt;

/// Consistency errors between feature models and the data built on them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
  /// Segments or sequences of two different models were combined
  Mismatch(String),
  /// A feature name was declared twice
  DuplicateFeature(String),
}
impl ModelError {
  /// The offending symbol, sequence or feature name
  #[must_use]
  pub fn text(&self) -> &str {
    match self {
      Self::Mismatch(s) | Self::DuplicateFeature(s) => s,
    }
  }
}

impl fmt::Display for ModelError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Mismatch(s) =>
        write!(f, "{s:?} belongs to a different feature model"),
      Self::DuplicateFeature(s) =>
        write!(f, "feature {s:?} is declared more than once"),
    }
  }
}
impl Error for ModelError {}
