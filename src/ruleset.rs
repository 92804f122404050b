//! A list of definitions and rules read from text, applied in order

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::CompileError;
use crate::model::{FeatureModel, Segmenter, Sequence};
use crate::rule::Rule;
use crate::variables::VariableStore;

/// A compile error and the 1-based line it was raised on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesetError {
  /// Line number
  pub line: usize,
  /// The problem
  pub error: CompileError,
}
impl fmt::Display for RulesetError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "line {}: {}", self.line, self.error)
  }
}
impl Error for RulesetError {
  fn source(&self) -> Option<&(dyn Error + 'static)> { Some(&self.error) }
}

/// Rules in the order they were written, with the macros defined along the
/// way
#[derive(Clone, Debug)]
pub struct Ruleset {
  rules: Vec<Rule>,
  store: VariableStore,
}
impl Ruleset {
  /// Parse a ruleset. `%` starts a comment, a line with `=` and no `>`
  /// defines a macro and every other non-blank line is a rule. A rule sees
  /// the macros defined above it.
  pub fn parse(text: &str, model: &Arc<FeatureModel>) -> Result<Self, RulesetError> {
    let mut store = VariableStore::new(model);
    let mut rules = Vec::new();
    for (idx, line) in text.lines().enumerate() {
      let line = line.split('%').next().unwrap_or_default().trim();
      if line.is_empty() {
        continue;
      }
      let res = if line.contains('=') && !line.contains('>') {
        store.add(line)
      } else {
        Rule::parse(line, &store).map(|r| rules.push(r))
      };
      res.map_err(|error| RulesetError { line: idx + 1, error })?;
    }
    tracing::debug!(rules = rules.len(), macros = store.names().count(), "compiled ruleset");
    Ok(Self { rules, store })
  }

  /// The rules in order
  #[must_use]
  pub fn rules(&self) -> &[Rule] { &self.rules }

  /// Macros as they stand after the last line
  #[must_use]
  pub fn variables(&self) -> &VariableStore { &self.store }

  /// A segmenter for words of the model, which knows its multi-character
  /// symbols
  #[must_use]
  pub fn segmenter(&self) -> Segmenter { Segmenter::new(self.store.model()) }

  /// Run every rule over the word, each on the output of the last
  #[must_use]
  pub fn apply(&self, word: &Sequence) -> Sequence {
    self.rules.iter().fold(word.clone(), |word, rule| rule.apply(&word))
  }

  /// [Ruleset::apply] on every word, in parallel
  #[must_use]
  pub fn apply_lexicon(&self, words: &[Sequence]) -> Vec<Sequence> {
    words.par_iter().map(|w| self.apply(w)).collect()
  }
}
