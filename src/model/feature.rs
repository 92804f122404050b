use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use intern_all::{i, Tok};
use once_cell::sync::Lazy;
use ordered_float::NotNan;

use super::{ModelError, Segment};
use crate::error::CompileResult;
use crate::rule::RuleError;

/// One slot of a feature vector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureValue {
  /// No value was ever assigned
  Undefined,
  /// Explicitly unspecified; used by bundles that should match any value
  Masked,
  /// A concrete value
  Value(NotNan<f64>),
}
impl FeatureValue {
  /// Wrap a number. NaN can't be ordered, so it reads as undefined.
  #[must_use]
  pub fn new(value: f64) -> Self {
    NotNan::new(value).map_or(Self::Undefined, Self::Value)
  }
  /// Whether a concrete value is present
  #[must_use]
  pub fn is_specified(&self) -> bool { matches!(self, Self::Value(_)) }
  /// Slot-wise match; anything is compatible with a missing value
  #[must_use]
  pub fn matches(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Value(a), Self::Value(b)) => a == b,
      _ => true,
    }
  }
}
impl fmt::Display for FeatureValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Undefined => write!(f, "?"),
      Self::Masked => write!(f, "*"),
      Self::Value(v) if v.into_inner() == 1.0 => write!(f, "+"),
      Self::Value(v) if v.into_inner() == -1.0 => write!(f, "-"),
      Self::Value(v) => write!(f, "{v}"),
    }
  }
}

/// Feature names and aliases, which is everything needed to read a
/// descriptor such as `[+cons,-voice,high=0.5,labial]`
#[derive(Clone, Debug, Default)]
struct Schema {
  features: Vec<String>,
  index: HashMap<String, usize>,
  aliases: HashMap<String, Vec<(usize, FeatureValue)>>,
}
impl Schema {
  fn feature(&self, name: &str, entry: &str) -> CompileResult<usize> {
    (self.index.get(name.trim()).copied())
      .ok_or_else(|| RuleError::UnknownFeature(entry.to_string()).into())
  }

  fn entry(&self, entry: &str) -> CompileResult<Vec<(usize, FeatureValue)>> {
    if let Some((name, value)) = entry.split_once('=') {
      let idx = self.feature(name, entry)?;
      let value = (value.trim().parse::<f64>().ok())
        .and_then(|v| NotNan::new(v).ok())
        .ok_or_else(|| RuleError::UnknownFeature(entry.to_string()))?;
      return Ok(vec![(idx, FeatureValue::Value(value))]);
    }
    if let Some(name) = entry.strip_prefix('+') {
      return Ok(vec![(self.feature(name, entry)?, FeatureValue::new(1.0))]);
    }
    if let Some(name) = entry.strip_prefix('-') {
      return Ok(vec![(self.feature(name, entry)?, FeatureValue::new(-1.0))]);
    }
    (self.aliases.get(entry).cloned())
      .ok_or_else(|| RuleError::UnknownFeature(entry.to_string()).into())
  }

  /// The explicit assignments of a descriptor, brackets optional
  fn entries(&self, descriptor: &str) -> CompileResult<Vec<(usize, FeatureValue)>> {
    let trimmed = descriptor.trim();
    let inner = (trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')))
      .unwrap_or(trimmed);
    let mut out = Vec::new();
    for entry in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
      out.extend(self.entry(entry)?);
    }
    Ok(out)
  }

  fn read(&self, descriptor: &str, fill: FeatureValue) -> CompileResult<Vec<FeatureValue>> {
    let mut values = vec![fill; self.features.len()];
    for (idx, value) in self.entries(descriptor)? {
      values[idx] = value;
    }
    Ok(values)
  }
}

static EMPTY: Lazy<Arc<FeatureModel>> =
  Lazy::new(|| Arc::new(FeatureModel::default()));

/// Maps symbols to feature vectors and back. Models are compared by
/// identity, so everything built on one must hold the same [Arc].
#[derive(Debug, Default)]
pub struct FeatureModel {
  schema: Schema,
  symbols: HashMap<Tok<String>, Arc<[FeatureValue]>>,
  order: Vec<Tok<String>>,
}
impl FeatureModel {
  /// The shared model without features, in which segments compare by
  /// symbol
  #[must_use]
  pub fn empty() -> Arc<Self> { EMPTY.clone() }

  /// Start defining a model
  #[must_use]
  pub fn builder() -> ModelBuilder { ModelBuilder::default() }

  /// Feature names in vector order
  #[must_use]
  pub fn features(&self) -> &[String] { &self.schema.features }

  /// Length of every feature vector in this model
  #[must_use]
  pub fn len(&self) -> usize { self.schema.features.len() }

  /// Whether the model has no features at all
  #[must_use]
  pub fn is_empty(&self) -> bool { self.schema.features.is_empty() }

  /// Position of a feature in the vector
  #[must_use]
  pub fn feature_index(&self, name: &str) -> Option<usize> {
    self.schema.index.get(name).copied()
  }

  /// Every defined symbol in definition order
  pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
    self.order.iter().map(|t| t.as_str())
  }

  /// Look up a symbol. Symbols the model doesn't define become featureless
  /// segments that only match themselves.
  #[must_use]
  pub fn resolve(self: &Arc<Self>, symbol: &str) -> Segment {
    let tok = i(symbol);
    let features = (self.symbols.get(&tok).cloned())
      .unwrap_or_else(|| self.undefined());
    Segment::new(tok, features, self.clone())
  }

  /// Build an underspecified segment from a descriptor like `[+voice,-nasal]`.
  /// Features the descriptor doesn't mention are masked.
  pub fn resolve_bundle(self: &Arc<Self>, descriptor: &str) -> CompileResult<Segment> {
    let values = self.schema.read(descriptor, FeatureValue::Masked)?;
    Ok(Segment::new(i(descriptor.trim()), values.into(), self.clone()))
  }

  /// The symbol defined with exactly this vector, if any
  #[must_use]
  pub fn symbol_for(&self, features: &[FeatureValue]) -> Option<Tok<String>> {
    (self.order.iter())
      .find(|t| self.symbols.get(*t).is_some_and(|v| v[..] == *features))
      .cloned()
  }

  pub(crate) fn undefined(&self) -> Arc<[FeatureValue]> {
    vec![FeatureValue::Undefined; self.len()].into()
  }
}

/// Incrementally declares features, aliases and symbols
#[derive(Debug, Default)]
pub struct ModelBuilder {
  schema: Schema,
  symbols: HashMap<Tok<String>, Vec<FeatureValue>>,
  order: Vec<Tok<String>>,
}
impl ModelBuilder {
  /// Append a feature to the vector. Symbols declared earlier get an
  /// undefined value for it.
  pub fn add_feature(&mut self, name: &str) -> CompileResult<&mut Self> {
    let name = name.trim();
    if self.schema.index.contains_key(name) {
      return Err(ModelError::DuplicateFeature(name.to_string()).into());
    }
    self.schema.index.insert(name.to_string(), self.schema.features.len());
    self.schema.features.push(name.to_string());
    for values in self.symbols.values_mut() {
      values.push(FeatureValue::Undefined);
    }
    Ok(self)
  }

  /// Name a set of assignments, e.g. `labial = [+lab,-cor]`, so descriptors
  /// can refer to it
  pub fn add_alias(&mut self, name: &str, descriptor: &str) -> CompileResult<&mut Self> {
    let entries = self.schema.entries(descriptor)?;
    self.schema.aliases.insert(name.trim().to_string(), entries);
    Ok(self)
  }

  /// Define or redefine a symbol. Features the descriptor leaves out are
  /// undefined.
  pub fn add_symbol(&mut self, symbol: &str, descriptor: &str) -> CompileResult<&mut Self> {
    let values = self.schema.read(descriptor, FeatureValue::Undefined)?;
    let tok = i(symbol.trim());
    if self.symbols.insert(tok.clone(), values).is_none() {
      self.order.push(tok);
    }
    Ok(self)
  }

  /// Freeze the model
  #[must_use]
  pub fn build(self) -> Arc<FeatureModel> {
    let Self { schema, symbols, order } = self;
    let symbols = (symbols.into_iter())
      .map(|(k, v)| (k, Arc::<[FeatureValue]>::from(v)))
      .collect();
    Arc::new(FeatureModel { schema, symbols, order })
  }
}

#[cfg(test)]
mod test {
  use super::{FeatureModel, FeatureValue};
  use crate::error::ErrorKind;

  #[test]
  fn descriptors() {
    let mut b = FeatureModel::builder();
    b.add_feature("cons").unwrap().add_feature("voice").unwrap();
    b.add_feature("high").unwrap();
    b.add_alias("stop", "[+cons]").unwrap();
    b.add_symbol("p", "[stop,-voice]").unwrap();
    b.add_symbol("i", "[-cons,+voice,high=1]").unwrap();
    let model = b.build();
    let p = model.resolve("p");
    assert_eq!(p.features(), &[
      FeatureValue::new(1.0),
      FeatureValue::new(-1.0),
      FeatureValue::Undefined
    ]);
    let bundle = model.resolve_bundle("[+voice]").unwrap();
    assert_eq!(bundle.features()[0], FeatureValue::Masked);
    assert_eq!(model.symbol_for(model.resolve("i").features()).unwrap().as_str(), "i");
  }

  #[test]
  fn unknown_feature() {
    let err = FeatureModel::empty().resolve_bundle("[+voice]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rule);
    assert_eq!(err.offending_text(), "+voice");
  }

  #[test]
  fn duplicate_feature() {
    let mut b = FeatureModel::builder();
    b.add_feature("voice").unwrap();
    assert_eq!(b.add_feature("voice").unwrap_err().kind(), ErrorKind::Model);
  }
}
