use std::borrow::Cow;
use std::collections::BTreeSet;

use hashbrown::HashSet;

use super::{GraphId, Label, Machine, StateId};
use crate::model::{Segment, Sequence};

/// A point of the simulation. `entered` records that the nested graph of the
/// state has already been run to get here.
type MatchState = (usize, StateId, bool);

impl Machine {
  /// Every position at which the pattern, started at `start`, can end.
  /// Empty if it can't match there.
  #[must_use]
  pub fn match_at(&self, target: &Sequence, start: usize) -> BTreeSet<usize> {
    self.match_slice(target.as_slice(), start)
  }

  /// Whether the pattern matches at `start`
  #[must_use]
  pub fn matches(&self, target: &Sequence, start: usize) -> bool {
    !self.match_at(target, start).is_empty()
  }

  /// [Machine::match_at] on a bare slice. A boundary is appended unless the
  /// slice already ends in one; positions past the slice are reported as its
  /// length.
  #[must_use]
  pub fn match_slice(&self, target: &[Segment], start: usize) -> BTreeSet<usize> {
    if start > target.len() {
      return BTreeSet::new();
    }
    let working: Cow<[Segment]> = match target.last() {
      Some(seg) if seg.is_boundary() => Cow::Borrowed(target),
      _ => {
        let mut v = target.to_vec();
        v.push(Segment::boundary(&self.model));
        Cow::Owned(v)
      },
    };
    let ends = self.run(self.root, &working, start);
    ends.into_iter().map(|pos| pos.min(target.len())).collect()
  }

  fn run(&self, id: GraphId, target: &[Segment], start: usize) -> BTreeSet<usize> {
    let graph = &self.graphs[id.0];
    let mut ends = BTreeSet::new();
    let mut seen = HashSet::<MatchState>::new();
    let mut queue = vec![(start, graph.start(), false)];
    while let Some(item) = queue.pop() {
      if !seen.insert(item) {
        continue;
      }
      let (pos, state, entered) = item;
      if let Some(sub) = graph.nested(state).filter(|_| !entered) {
        queue.extend(self.run(sub, target, pos).into_iter().map(|end| (end, state, true)));
        continue;
      }
      if graph.is_accepting(state) {
        ends.insert(pos);
      }
      for (label, next) in graph.arcs(state) {
        queue.extend(self.advance(label, target, pos).into_iter().map(|end| (end, *next, false)));
      }
    }
    ends
  }

  fn advance(&self, label: &Label, target: &[Segment], pos: usize) -> Vec<usize> {
    match label {
      Label::Not(sub) => {
        let present = target.get(pos).is_some_and(|seg| !seg.is_boundary());
        if present && self.run(*sub, target, pos).is_empty() { vec![pos + 1] } else { Vec::new() }
      },
      _ => label.advance(target, pos).into_iter().map(|(end, _)| end).collect(),
    }
  }
}

#[cfg(test)]
mod test {
  use std::collections::BTreeSet;

  use crate::machine::Machine;
  use crate::model::{FeatureModel, Segmenter};
  use crate::utils::Side;
  use crate::variables::VariableStore;

  fn ends(pattern: &str, word: &str, start: usize) -> Vec<usize> {
    let mut store = VariableStore::new(&FeatureModel::empty());
    store.add("V = a e").unwrap();
    store.add("S = st sk").unwrap();
    let m = Machine::from_pattern(pattern, &store, Side::Right).unwrap();
    let seq = Segmenter::new(store.model()).segment(word);
    m.match_at(&seq, start).into_iter().collect()
  }

  #[test]
  fn quantifiers() {
    assert_eq!(ends("a*", "aab", 0), vec![0, 1, 2]);
    assert_eq!(ends("a+", "aab", 0), vec![1, 2]);
    assert_eq!(ends("a?b", "ab", 0), vec![2]);
    assert_eq!(ends("(ab)+", "ababa", 0), vec![2, 4]);
    assert_eq!(ends("(ab)*", "ababa", 1), vec![1]);
  }

  #[test]
  fn loops_stay_local() {
    // a loop back into the group must not become reachable from after `b`
    assert_eq!(ends("(x)+b+", "xbxb", 0), vec![2]);
    assert_eq!(ends("{b+ c}", "bc", 0), vec![1]);
  }

  #[test]
  fn macros_branch() {
    assert_eq!(ends("SV", "stesk", 0), vec![3]);
    assert_eq!(ends("{S V}+", "askst", 0), vec![1, 3, 5]);
  }

  #[test]
  fn boundary_and_wildcard() {
    assert_eq!(ends("ab#", "ab", 0), vec![2], "the boundary sentinel is implied");
    assert_eq!(ends(".*", "abc", 0), vec![0, 1, 2, 3], "wildcard stops at the boundary");
    assert_eq!(ends("#", "ab", 1), Vec::<usize>::new());
    assert_eq!(ends("a", "a", 3), Vec::<usize>::new(), "out of range start");
  }

  #[test]
  fn negation() {
    assert_eq!(ends("!a", "ba", 0), vec![1]);
    assert_eq!(ends("!a", "ab", 0), Vec::<usize>::new());
    assert_eq!(ends("!a", "b", 1), Vec::<usize>::new(), "nothing to consume");
    assert_eq!(ends("!{a e}+", "bcd", 0), vec![1, 2, 3]);
    assert_eq!(ends("!(ab)", "ac", 0), vec![1]);
  }

  #[test]
  fn left_side_reads_backwards() {
    let mut store = VariableStore::new(&FeatureModel::empty());
    store.add("S = st").unwrap();
    let m = Machine::from_pattern("#Sa", &store, Side::Left).unwrap();
    let head = Segmenter::new(store.model()).segment("sta").reversed();
    assert_eq!(m.match_at(&head, 0), BTreeSet::from([3]));
    let head = Segmenter::new(store.model()).segment("tsa").reversed();
    assert!(m.match_at(&head, 0).is_empty());
  }
}
