use std::fmt;

use itertools::Either;

/// The direction a pattern is read in. Left context is matched outward from
/// the focus, so it is compiled right to left against a reversed slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
  /// Read right to left
  Left,
  /// Read left to right
  Right,
}

impl fmt::Display for Side {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Left => write!(f, "Left"),
      Self::Right => write!(f, "Right"),
    }
  }
}

impl Side {
  /// The other side
  #[must_use]
  pub fn opposite(&self) -> Self {
    match self {
      Self::Left => Self::Right,
      Self::Right => Self::Left,
    }
  }

  /// Walks a slice forward on Right and backward on Left
  pub fn walk<'a, T>(&self, slice: &'a [T]) -> impl Iterator<Item = &'a T> + 'a {
    match self {
      Self::Right => Either::Left(slice.iter()),
      Self::Left => Either::Right(slice.iter().rev()),
    }
  }

  /// Copy of the slice in reading order
  #[must_use]
  pub fn orient<T: Clone>(&self, slice: &[T]) -> Vec<T> { self.walk(slice).cloned().collect() }
}
