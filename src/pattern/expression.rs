use std::fmt;

use intern_all::Tok;
use itertools::Itertools;

use crate::model::{Segment, BOUNDARY, WILDCARD};
use crate::utils::Side;

/// Repetition attached to a node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Quantifier {
  /// Exactly once
  #[default]
  One,
  /// `?`, zero or one times
  Optional,
  /// `*`, any number of times
  Star,
  /// `+`, at least once
  Plus,
}
impl Quantifier {
  /// Combine the two flags; both together are Kleene star
  #[must_use]
  pub fn from_flags(optional: bool, repeatable: bool) -> Self {
    match (optional, repeatable) {
      (false, false) => Self::One,
      (true, false) => Self::Optional,
      (true, true) => Self::Star,
      (false, true) => Self::Plus,
    }
  }
  /// May be skipped
  #[must_use]
  pub fn is_optional(self) -> bool { matches!(self, Self::Optional | Self::Star) }
  /// May be repeated
  #[must_use]
  pub fn is_repeatable(self) -> bool { matches!(self, Self::Star | Self::Plus) }
}
impl fmt::Display for Quantifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::One => Ok(()),
      Self::Optional => write!(f, "?"),
      Self::Star => write!(f, "*"),
      Self::Plus => write!(f, "+"),
    }
  }
}

/// Leaf of a pattern
#[derive(Clone, Debug, PartialEq)]
pub enum Terminal {
  /// A segment or a feature bundle
  Literal(Segment),
  /// `#`
  Boundary,
  /// `.`
  Wildcard,
  /// Reference to a macro in the variable store
  Macro(Tok<String>),
}

/// Shape of a node
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
  /// A single unit
  Terminal(Terminal),
  /// `( ... )`, its children matched in a row
  Group(Vec<Expression>),
  /// `{ ... }`, exactly one of its children matched
  Alternation(Vec<Expression>),
}

/// A node of a parsed pattern. A whole pattern is a `Vec<Expression>`, an
/// implicit group.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
  /// What the node matches
  pub kind: ExprKind,
  /// How many times
  pub quantifier: Quantifier,
  /// Whether the node is inverted with `!`
  pub negative: bool,
}
impl Expression {
  /// Unquantified, positive node
  #[must_use]
  pub fn new(kind: ExprKind) -> Self { Self { kind, quantifier: Quantifier::One, negative: false } }

  /// Unquantified, positive leaf
  #[must_use]
  pub fn terminal(terminal: Terminal) -> Self { Self::new(ExprKind::Terminal(terminal)) }

  /// Replace the quantifier
  #[must_use]
  pub fn quantified(self, quantifier: Quantifier) -> Self { Self { quantifier, ..self } }

  /// Set the negation flag
  #[must_use]
  pub fn negated(self) -> Self { Self { negative: true, ..self } }

  /// Whether the node is a bare word boundary
  #[must_use]
  pub fn is_boundary(&self) -> bool {
    matches!(self.kind, ExprKind::Terminal(Terminal::Boundary))
  }

  /// Whether a word boundary is all the node can match
  #[must_use]
  pub fn is_only_boundary(&self) -> bool {
    match &self.kind {
      ExprKind::Terminal(t) => matches!(t, Terminal::Boundary),
      ExprKind::Group(children) => matches!(&children[..], [only] if only.is_only_boundary()),
      ExprKind::Alternation(alts) =>
        !alts.is_empty() && alts.iter().all(Expression::is_only_boundary),
    }
  }

  /// Whether the first unit read in the direction of `side` can be a word
  /// boundary. [Side::Left] asks about the last unit of the text.
  #[must_use]
  pub fn edge_is_boundary(&self, side: Side) -> bool {
    match &self.kind {
      ExprKind::Terminal(t) => matches!(t, Terminal::Boundary),
      ExprKind::Group(children) =>
        side.walk(children).next().is_some_and(|c| c.edge_is_boundary(side)),
      ExprKind::Alternation(alts) => alts.iter().any(|a| a.edge_is_boundary(side)),
    }
  }

  /// Whether the node is a plain group that only exists to hold a sequence,
  /// as the alternatives of a `{ }` do
  fn is_bare_group(&self) -> bool {
    matches!(self.kind, ExprKind::Group(_))
      && self.quantifier == Quantifier::One
      && !self.negative
  }
}

/// Print a sequence of nodes back as pattern text
#[must_use]
pub fn pattern_text(exprs: &[Expression]) -> String { exprs.iter().join("") }

impl fmt::Display for Expression {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.negative {
      write!(f, "!")?;
    }
    match &self.kind {
      ExprKind::Terminal(Terminal::Literal(seg)) => write!(f, "{seg}")?,
      ExprKind::Terminal(Terminal::Boundary) => write!(f, "{BOUNDARY}")?,
      ExprKind::Terminal(Terminal::Wildcard) => write!(f, "{WILDCARD}")?,
      ExprKind::Terminal(Terminal::Macro(name)) => write!(f, "{}", name.as_str())?,
      ExprKind::Group(children) => write!(f, "({})", pattern_text(children))?,
      ExprKind::Alternation(alts) => {
        let alts = alts.iter().map(|alt| match &alt.kind {
          ExprKind::Group(children) if alt.is_bare_group() => pattern_text(children),
          _ => alt.to_string(),
        });
        write!(f, "{{{}}}", alts.format(" "))?
      },
    }
    write!(f, "{}", self.quantifier)
  }
}
