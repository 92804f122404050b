//! Macros: named alternations of sequences usable as a single pattern token

use std::sync::Arc;

use hashbrown::HashMap;
use intern_all::{i, Tok};
use itertools::Itertools;

use crate::error::CompileResult;
use crate::model::{FeatureModel, Segmenter, Sequence};
use crate::pattern::PatternError;

/// Macro definitions. Every stored alternative is fully expanded when it is
/// added, so no alternative ever refers to another macro.
#[derive(Clone, Debug)]
pub struct VariableStore {
  model: Arc<FeatureModel>,
  vars: HashMap<Tok<String>, Arc<[Sequence]>>,
  names: Vec<Tok<String>>,
}
impl VariableStore {
  /// Empty store for a model
  #[must_use]
  pub fn new(model: &Arc<FeatureModel>) -> Self {
    Self { model: model.clone(), vars: HashMap::new(), names: Vec::new() }
  }

  /// The model every alternative is resolved against
  #[must_use]
  pub fn model(&self) -> &Arc<FeatureModel> { &self.model }

  /// Parse and add a line of the form `NAME = alt1 alt2 ...`
  pub fn add(&mut self, definition: &str) -> CompileResult<()> {
    let malformed = || PatternError::MalformedDefinition(definition.trim().to_string());
    let (name, body) = definition.split_once('=').ok_or_else(malformed)?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) || body.trim().is_empty() {
      return Err(malformed().into());
    }
    self.define(name, body.split_whitespace())
  }

  /// Define `name` as the union of `tokens`. A token mentioning other macros
  /// stands for every combination of their alternatives, so with `C = p t`,
  /// the token `Ca` contributes `pa` and `ta`. Redefining a name replaces it.
  pub fn define<'a>(
    &mut self,
    name: &str,
    tokens: impl IntoIterator<Item = &'a str>,
  ) -> CompileResult<()> {
    let segmenter = Segmenter::with_symbols(&self.model, self.names().chain([name]));
    let mut alternatives = Vec::new();
    for token in tokens {
      let options = (segmenter.split(token).into_iter())
        .map(|sym| self.expand(name, sym))
        .collect::<Result<Vec<_>, _>>()?;
      let combos = (options.into_iter().map(Vec::into_iter)).multi_cartesian_product();
      alternatives.extend(combos.map(|parts| {
        let segments = parts.iter().flat_map(|s| s.iter().cloned()).collect();
        Sequence::from_parts(self.model.clone(), segments)
      }));
    }
    tracing::debug!(name, alternatives = alternatives.len(), "defined macro");
    let tok = i(name);
    if self.vars.insert(tok.clone(), alternatives.into()).is_none() {
      self.names.push(tok);
    }
    Ok(())
  }

  fn expand(&self, name: &str, sym: &str) -> Result<Vec<Sequence>, PatternError> {
    if sym == name {
      return Err(PatternError::CyclicMacro(name.to_string()));
    }
    Ok(match self.vars.get(&i(sym)) {
      Some(alts) => alts.to_vec(),
      None => vec![Sequence::from_parts(self.model.clone(), vec![self.model.resolve(sym)])],
    })
  }

  /// Alternatives of a macro
  #[must_use]
  pub fn get(&self, name: &str) -> Option<&Arc<[Sequence]>> { self.vars.get(&i(name)) }

  /// Alternatives of a macro, or an error naming it
  pub fn alternatives(&self, name: &str) -> Result<Arc<[Sequence]>, PatternError> {
    (self.get(name).cloned()).ok_or_else(|| PatternError::UnknownMacro(name.to_string()))
  }

  /// Whether `name` is a macro
  #[must_use]
  pub fn contains(&self, name: &str) -> bool { self.vars.contains_key(&i(name)) }

  /// Macro names in definition order
  pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
    self.names.iter().map(|t| t.as_str())
  }

  /// A segmenter that keeps macro names whole
  #[must_use]
  pub fn segmenter(&self) -> Segmenter { Segmenter::with_symbols(&self.model, self.names()) }
}

#[cfg(test)]
mod test {
  use itertools::Itertools;

  use super::VariableStore;
  use crate::error::ErrorKind;
  use crate::model::FeatureModel;
  use crate::pattern::PatternError;

  fn show(store: &VariableStore, name: &str) -> String {
    store.get(name).unwrap().iter().map(|s| s.to_string()).join(" ")
  }

  #[test]
  fn nested_expansion() {
    let mut store = VariableStore::new(&FeatureModel::empty());
    store.add("C = p t k").unwrap();
    store.add("N = m n").unwrap();
    store.add("X = C Na").unwrap();
    assert_eq!(show(&store, "X"), "p t k ma na");
    store.add("P = CN").unwrap();
    assert_eq!(show(&store, "P"), "pm pn tm tn km kn");
  }

  #[test]
  fn self_reference_is_rejected() {
    let mut store = VariableStore::new(&FeatureModel::empty());
    store.add("V = a e").unwrap();
    let err = store.add("V = V o").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Pattern);
    assert_eq!(err.offending_text(), "V");
    assert!(store.add("W = aWa").is_err());
    assert_eq!(show(&store, "V"), "a e", "failed definitions leave no trace");
  }

  #[test]
  fn malformed() {
    let mut store = VariableStore::new(&FeatureModel::empty());
    for bad in ["C p t", "= p t", "C =", "A B = p"] {
      assert!(
        matches!(store.add(bad), Err(e) if e.offending_text() == bad.trim()),
        "{bad:?} should be rejected"
      );
    }
    assert_eq!(
      store.alternatives("Q").unwrap_err(),
      PatternError::UnknownMacro("Q".to_string())
    );
  }
}
