//! Environments of a rule: where in a word a change may apply

use std::fmt;
use std::iter;

use itertools::Itertools;

use crate::error::CompileResult;
use crate::machine::Machine;
use crate::model::{Segment, Sequence};
use crate::pattern::PatternError;
use crate::utils::Side;
use crate::variables::VariableStore;

/// A single `left_right` environment
#[derive(Clone, Debug)]
pub struct Condition {
  pre: Machine,
  post: Machine,
  text: String,
}
impl Condition {
  /// Parse `left_right`. The left pattern is compiled to read outward from
  /// the focus.
  pub fn new(text: &str, store: &VariableStore) -> CompileResult<Self> {
    let text = text.trim();
    let parts = text.split('_').collect_vec();
    let [pre, post] = parts[..] else {
      return Err(PatternError::SeparatorCount(text.to_string()).into());
    };
    Ok(Self {
      pre: Machine::from_pattern(pre, store, Side::Left)?,
      post: Machine::from_pattern(post, store, Side::Right)?,
      text: text.to_string(),
    })
  }

  /// Whether the environment surrounds `sequence[start..end]`. Spans outside
  /// the sequence never match.
  #[must_use]
  pub fn is_match(&self, sequence: &Sequence, start: usize, end: usize) -> bool {
    if start > end || end > sequence.len() {
      return false;
    }
    let boundary = Segment::boundary(sequence.model());
    let segments = sequence.as_slice();
    let head = (iter::once(boundary.clone()).chain(segments[..start].iter().cloned()))
      .rev()
      .collect_vec();
    let tail = segments[end..].iter().cloned().chain([boundary]).collect_vec();
    !self.pre.match_slice(&head, 0).is_empty() && !self.post.match_slice(&tail, 0).is_empty()
  }

  /// Whether both sides are empty
  #[must_use]
  pub fn is_trivial(&self) -> bool { self.pre.is_trivial() && self.post.is_trivial() }

  /// The text the condition was parsed from
  #[must_use]
  pub fn text(&self) -> &str { &self.text }
}
impl fmt::Display for Condition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.text) }
}

/// Whitespace separated words, not splitting inside brackets
pub(crate) fn top_level_words(text: &str) -> Vec<&str> {
  let mut out = Vec::new();
  let mut depth = 0usize;
  let mut word_start = None;
  for (idx, c) in text.char_indices() {
    match c {
      '{' | '(' | '[' => depth += 1,
      '}' | ')' | ']' => depth = depth.saturating_sub(1),
      c if c.is_whitespace() && depth == 0 => {
        if let Some(ws) = word_start.take() {
          out.push(&text[ws..idx]);
        }
        continue;
      },
      _ => (),
    }
    word_start.get_or_insert(idx);
  }
  out.extend(word_start.map(|ws| &text[ws..]));
  out
}

/// A compound environment: `A or B not C` applies where `A` or `B` matches
/// and `C` doesn't. With no positive clauses, it applies everywhere `C`
/// doesn't.
#[derive(Clone, Debug, Default)]
pub struct Environment {
  any: Vec<Condition>,
  none: Vec<Condition>,
}
impl Environment {
  /// Applies everywhere
  #[must_use]
  pub fn unconditional() -> Self { Self::default() }

  /// Parse clauses separated by the keywords `or` and `not`. `or` adds to
  /// whichever list is being filled and `not` switches to the exclusions.
  pub fn parse(text: &str, store: &VariableStore) -> CompileResult<Self> {
    let mut env = Self::unconditional();
    let mut negate = false;
    let mut clause = Vec::new();
    let mut leading = true;
    for word in top_level_words(text) {
      match word {
        "or" | "not" => {
          if !(leading && word == "not" && clause.is_empty()) {
            env.push(negate, &clause.join(" "), store)?;
          }
          negate |= word == "not";
          leading = false;
          clause.clear();
        },
        _ => clause.push(word),
      }
    }
    if !(clause.is_empty() && leading) {
      env.push(negate, &clause.join(" "), store)?;
    }
    Ok(env)
  }

  fn push(&mut self, negate: bool, text: &str, store: &VariableStore) -> CompileResult<()> {
    let cond = Condition::new(text, store)?;
    if negate { self.none.push(cond) } else { self.any.push(cond) }
    Ok(())
  }

  /// Whether the change at `sequence[start..end]` is licensed
  #[must_use]
  pub fn is_match(&self, sequence: &Sequence, start: usize, end: usize) -> bool {
    (self.any.is_empty() || self.any.iter().any(|c| c.is_match(sequence, start, end)))
      && !self.none.iter().any(|c| c.is_match(sequence, start, end))
  }

  /// Whether the environment has no clauses
  #[must_use]
  pub fn is_unconditional(&self) -> bool { self.any.is_empty() && self.none.is_empty() }

  /// The positive clauses
  #[must_use]
  pub fn clauses(&self) -> &[Condition] { &self.any }

  /// The excluded clauses
  #[must_use]
  pub fn exclusions(&self) -> &[Condition] { &self.none }
}
impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.any.iter().join(" or "))?;
    if !self.none.is_empty() {
      let sep = if self.any.is_empty() { "" } else { " " };
      write!(f, "{sep}not {}", self.none.iter().join(" or "))?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod test {
  use super::{top_level_words, Condition, Environment};
  use crate::error::ErrorKind;
  use crate::model::{FeatureModel, Segmenter};
  use crate::variables::VariableStore;

  fn store() -> VariableStore {
    let mut store = VariableStore::new(&FeatureModel::empty());
    store.add("V = a e i o u").unwrap();
    store
  }

  #[test]
  fn intervocalic() {
    let store = store();
    let cond = Condition::new("V_V", &store).unwrap();
    let word = Segmenter::new(store.model()).segment("atapa");
    assert!(cond.is_match(&word, 1, 2));
    assert!(!cond.is_match(&word, 0, 1));
    assert!(!cond.is_match(&word, 1, 3));
    assert!(!cond.is_match(&word, 4, 6), "out of range");
  }

  #[test]
  fn anchored() {
    let store = store();
    let word = Segmenter::new(store.model()).segment("pata");
    let initial = Condition::new("#_", &store).unwrap();
    assert!(initial.is_match(&word, 0, 1));
    assert!(!initial.is_match(&word, 2, 3));
    let final_ = Condition::new("_#", &store).unwrap();
    assert!(final_.is_match(&word, 3, 4));
    assert!(final_.is_match(&word, 4, 4), "empty span at the end");
  }

  #[test]
  fn left_context_is_read_outward() {
    let store = store();
    let seg = Segmenter::new(store.model());
    let repeated = Condition::new("(ab)+_", &store).unwrap();
    assert!(repeated.is_match(&seg.segment("ababx"), 4, 5));
    assert!(repeated.is_match(&seg.segment("xabx"), 3, 4));
    assert!(!repeated.is_match(&seg.segment("abbax"), 4, 5));
    let either = Condition::new("{ab c}_", &store).unwrap();
    assert!(either.is_match(&seg.segment("abx"), 2, 3));
    assert!(either.is_match(&seg.segment("cx"), 1, 2));
    assert!(!either.is_match(&seg.segment("bax"), 2, 3));
    let anchored = Condition::new("#(pa)*V?t_", &store).unwrap();
    assert!(anchored.is_match(&seg.segment("papaets"), 6, 7));
    assert!(anchored.is_match(&seg.segment("ts"), 1, 2));
    assert!(!anchored.is_match(&seg.segment("apets"), 4, 5));
  }

  #[test]
  fn empty_environment_matches_anywhere() {
    let store = store();
    let cond = Condition::new("_", &store).unwrap();
    assert!(cond.is_trivial());
    let word = Segmenter::new(store.model()).segment("abc");
    assert!((0..=3).all(|i| cond.is_match(&word, i, i)));
  }

  #[test]
  fn separators() {
    let store = store();
    for bad in ["a", "a_b_c", ""] {
      let err = Condition::new(bad, &store).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::Pattern);
    }
  }

  #[test]
  fn compound() {
    let store = store();
    assert_eq!(top_level_words(" {a b}_  or x_ "), vec!["{a b}_", "or", "x_"]);
    let env = Environment::parse("#_ or V_ not a_", &store).unwrap();
    assert_eq!(env.clauses().len(), 2);
    assert_eq!(env.exclusions().len(), 1);
    assert_eq!(env.to_string(), "#_ or V_ not a_");
    let word = Segmenter::new(store.model()).segment("tatet");
    assert!(env.is_match(&word, 0, 1));
    assert!(!env.is_match(&word, 2, 3), "excluded after a");
    assert!(env.is_match(&word, 4, 5));
    assert!(!env.is_match(&word, 1, 2));
    let only_not = Environment::parse("not _#", &store).unwrap();
    assert!(only_not.is_match(&word, 0, 1));
    assert!(!only_not.is_match(&word, 4, 5));
    assert!(Environment::parse("", &store).unwrap().is_unconditional());
    assert!(Environment::parse("a_ not", &store).is_err());
  }
}
