use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use intern_all::{i, Tok};

use super::{FeatureModel, FeatureValue, ModelError};

/// Symbol of the word boundary anchor
pub const BOUNDARY: &str = "#";
/// Symbol of the single-segment wildcard
pub const WILDCARD: &str = ".";

/// An immutable phonetic symbol with its feature vector
#[derive(Clone)]
pub struct Segment {
  symbol: Tok<String>,
  features: Arc<[FeatureValue]>,
  model: Arc<FeatureModel>,
}
impl Segment {
  pub(crate) fn new(
    symbol: Tok<String>,
    features: Arc<[FeatureValue]>,
    model: Arc<FeatureModel>,
  ) -> Self {
    debug_assert_eq!(features.len(), model.len(), "vector length is fixed by the model");
    Self { symbol, features, model }
  }

  /// The `#` sentinel appended to both ends of a word during matching
  #[must_use]
  pub fn boundary(model: &Arc<FeatureModel>) -> Self {
    Self::new(i(BOUNDARY), model.undefined(), model.clone())
  }

  /// The `.` segment
  #[must_use]
  pub fn wildcard(model: &Arc<FeatureModel>) -> Self {
    Self::new(i(WILDCARD), model.undefined(), model.clone())
  }

  /// Display symbol
  #[must_use]
  pub fn symbol(&self) -> &str { self.symbol.as_str() }

  /// Interned display symbol
  #[must_use]
  pub fn token(&self) -> &Tok<String> { &self.symbol }

  /// Feature vector, one slot per model feature
  #[must_use]
  pub fn features(&self) -> &[FeatureValue] { &self.features }

  /// The model this segment was resolved against
  #[must_use]
  pub fn model(&self) -> &Arc<FeatureModel> { &self.model }

  /// Whether this is the word boundary
  #[must_use]
  pub fn is_boundary(&self) -> bool { self.symbol() == BOUNDARY }

  /// Whether this is the wildcard
  #[must_use]
  pub fn is_wildcard(&self) -> bool { self.symbol() == WILDCARD }

  /// Whether any slot holds a concrete value
  #[must_use]
  pub fn is_featured(&self) -> bool {
    self.features.iter().any(FeatureValue::is_specified)
  }

  /// Whether both segments were built on the same model
  #[must_use]
  pub fn same_model(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.model, &other.model)
  }

  /// Matching equality. Two featured segments are compared slot by slot,
  /// tolerating undefined and masked values on either side; if either one is
  /// featureless only the symbols are compared.
  #[must_use]
  pub fn matches(&self, other: &Self) -> bool {
    if !self.same_model(other) {
      return false;
    }
    if self.is_featured() && other.is_featured() {
      (self.features.iter().zip(other.features.iter())).all(|(a, b)| a.matches(b))
    } else {
      self.symbol == other.symbol
    }
  }

  /// Copy this segment, overwriting the features `overwrite` specifies
  pub fn alter(&self, overwrite: &Self) -> Result<Self, ModelError> {
    if !self.same_model(overwrite) {
      return Err(ModelError::Mismatch(overwrite.symbol().to_string()));
    }
    Ok(self.altered(overwrite))
  }

  /// [Segment::alter] for callers that already checked the model
  pub(crate) fn altered(&self, overwrite: &Self) -> Self {
    let features = (self.features.iter().zip(overwrite.features.iter()))
      .map(|(old, new)| if new.is_specified() { *new } else { *old })
      .collect::<Arc<[FeatureValue]>>();
    let symbol =
      self.model.symbol_for(&features).unwrap_or_else(|| self.symbol.clone());
    Self::new(symbol, features, self.model.clone())
  }
}

impl PartialEq for Segment {
  fn eq(&self, other: &Self) -> bool {
    self.symbol == other.symbol
      && self.features == other.features
      && self.same_model(other)
  }
}
impl Eq for Segment {}
impl Hash for Segment {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.symbol.hash(state);
    self.features.hash(state);
  }
}
impl fmt::Debug for Segment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Segment({})", self.symbol())
  }
}
impl fmt::Display for Segment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.symbol())
  }
}

#[cfg(test)]
mod test {
  use super::Segment;
  use crate::model::FeatureModel;

  fn model() -> std::sync::Arc<FeatureModel> {
    let mut b = FeatureModel::builder();
    b.add_feature("cons").unwrap().add_feature("voice").unwrap();
    b.add_symbol("p", "[+cons,-voice]").unwrap();
    b.add_symbol("b", "[+cons,+voice]").unwrap();
    b.add_symbol("a", "[-cons,+voice]").unwrap();
    b.build()
  }

  #[test]
  fn featured_matching() {
    let m = model();
    assert!(m.resolve("p").matches(&m.resolve("p")));
    assert!(!m.resolve("p").matches(&m.resolve("b")));
    let voiced = m.resolve_bundle("[+voice]").unwrap();
    assert!(voiced.matches(&m.resolve("b")));
    assert!(voiced.matches(&m.resolve("a")));
    assert!(!voiced.matches(&m.resolve("p")));
    assert!(!voiced.matches(&Segment::boundary(&m)), "bundles never match #");
  }

  #[test]
  fn featureless_matching() {
    let m = FeatureModel::empty();
    assert!(m.resolve("x").matches(&m.resolve("x")));
    assert!(!m.resolve("x").matches(&m.resolve("y")));
    assert!(!m.resolve("x").matches(&model().resolve("x")), "models must agree");
  }

  #[test]
  fn alter_resolves_symbol() {
    let m = model();
    let voiced = m.resolve_bundle("[+voice]").unwrap();
    let b = m.resolve("p").alter(&voiced).unwrap();
    assert_eq!(b.symbol(), "b");
    assert_eq!(b, m.resolve("b"));
    assert!(m.resolve("p").alter(&FeatureModel::empty().resolve("x")).is_err());
  }
}
