use std::fmt;
use std::sync::Arc;

use super::target::{Capture, TargetItem};
use crate::condition::Environment;
use crate::machine::Label;
use crate::model::{FeatureModel, Segment, Sequence};

/// One source token paired with its target
#[derive(Clone, Debug)]
pub struct Change {
  source: Vec<Label>,
  target: Vec<TargetItem>,
  text: String,
}
impl Change {
  pub(super) fn new(source: Vec<Label>, target: Vec<TargetItem>, text: String) -> Self {
    Self { source, target, text }
  }

  /// Whether the source is `0`
  #[must_use]
  pub fn is_insertion(&self) -> bool { self.source.is_empty() }

  /// Every way the source can match at `start`, longest first. Ties keep
  /// the order of macro alternatives.
  #[must_use]
  pub fn candidates(&self, word: &[Segment], start: usize) -> Vec<(usize, Vec<Capture>)> {
    fn extend(
      labels: &[Label],
      word: &[Segment],
      pos: usize,
      captures: &mut Vec<Capture>,
      out: &mut Vec<(usize, Vec<Capture>)>,
    ) {
      let Some((label, rest)) = labels.split_first() else {
        out.push((pos, captures.clone()));
        return;
      };
      for (end, alternative) in label.advance(word, pos) {
        captures.push(Capture { range: pos..end, alternative });
        extend(rest, word, end, captures, out);
        captures.pop();
      }
    }
    let mut out = Vec::new();
    extend(&self.source, word, start, &mut Vec::new(), &mut out);
    out.sort_by(|a, b| b.0.cmp(&a.0));
    out
  }

  /// The replacement for a match
  #[must_use]
  pub fn render(&self, word: &[Segment], captures: &[Capture]) -> Vec<Segment> {
    let mut out = Vec::new();
    for item in &self.target {
      item.render(word, captures, &mut out);
    }
    out
  }
}
impl fmt::Display for Change {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.text) }
}

/// A compiled sound change. Applying it is a pure function of the word.
#[derive(Clone, Debug)]
pub struct Rule {
  text: String,
  model: Arc<FeatureModel>,
  changes: Vec<Change>,
  environment: Environment,
}
impl Rule {
  pub(super) fn new(
    text: String,
    model: Arc<FeatureModel>,
    changes: Vec<Change>,
    environment: Environment,
  ) -> Self {
    Self { text, model, changes, environment }
  }

  /// Source and target pairs in the order they were written
  #[must_use]
  pub fn changes(&self) -> &[Change] { &self.changes }

  /// Where the rule applies
  #[must_use]
  pub fn environment(&self) -> &Environment { &self.environment }

  /// The model the rule was compiled against
  #[must_use]
  pub fn model(&self) -> &Arc<FeatureModel> { &self.model }

  /// The rule as written
  #[must_use]
  pub fn text(&self) -> &str { &self.text }

  /// The first licensed rewrite at `start`, as the end of the replaced span
  /// and the replacement
  fn rewrite_at(&self, word: &Sequence, start: usize) -> Option<(usize, Vec<Segment>)> {
    for change in &self.changes {
      for (end, captures) in change.candidates(word.as_slice(), start) {
        if self.environment.is_match(word, start, end) {
          return Some((end, change.render(word.as_slice(), &captures)));
        }
      }
    }
    None
  }

  /// Rewrite every site of the word in one left to right pass. Scanning
  /// resumes after each replacement, so output is never rewritten again;
  /// after an insertion the next gap is skipped as well. A deletion leaves
  /// the scan where it was, so the segment that followed is still examined
  /// and an insertion may fill the gap the deletion left.
  #[must_use]
  pub fn apply(&self, word: &Sequence) -> Sequence {
    if !Arc::ptr_eq(word.model(), &self.model) {
      tracing::warn!(rule = %self, %word, "word belongs to another feature model");
      return word.clone();
    }
    let mut out = word.clone();
    let mut pos = 0;
    while pos <= out.len() {
      let Some((end, replacement)) = self.rewrite_at(&out, pos) else {
        pos += 1;
        continue;
      };
      let len = replacement.len();
      tracing::trace!(rule = %self, at = pos, from = %out, "rewrite");
      out.splice_segments(pos..end, replacement);
      pos += if end == pos { len + 1 } else { len };
    }
    out
  }
}
impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.text) }
}
