//! Property-based tests for the pattern machine and rule application
//!
//! Words are drawn from a small alphabet so that patterns over the same
//! alphabet match often enough to be interesting.

use std::collections::BTreeSet;

use proptest::prelude::*;
use soundshift::model::{FeatureModel, Segmenter, Sequence};
use soundshift::utils::Side;
use soundshift::{Condition, Machine, Rule, VariableStore};

const PATTERNS: &[&str] = &[
  "a", "a*b", "(ab)+", "{a bc}*d?", "!a.", "a#", ".*#", "(a{b c})*", "V+", "!{a V}*b", "",
];
const UNITS: &[&str] = &["a", "b", "V", "(ab)", "{a cd}", ".", "!c"];

fn store() -> VariableStore {
  let mut store = VariableStore::new(&FeatureModel::empty());
  store.add("V = a e").unwrap();
  store
}

fn word(store: &VariableStore, text: &str) -> Sequence { Segmenter::new(store.model()).segment(text) }

fn ends(pattern: &str, seq: &Sequence, start: usize) -> BTreeSet<usize> {
  let store = store();
  Machine::from_pattern(pattern, &store, Side::Right).unwrap().match_at(seq, start)
}

proptest! {
  #[test]
  fn ends_stay_in_range(pattern in prop::sample::select(PATTERNS), text in "[abcde]{0,8}", start in 0usize..10) {
    let seq = word(&store(), &text);
    let found = ends(pattern, &seq, start);
    if start > seq.len() {
      prop_assert!(found.is_empty());
    }
    prop_assert!(found.iter().all(|e| start <= *e && *e <= seq.len()));
  }

  #[test]
  fn optional_is_a_superset(unit in prop::sample::select(UNITS), text in "[abcde]{0,6}", start in 0usize..7) {
    let seq = word(&store(), &text);
    prop_assume!(start <= seq.len());
    let optional = ends(&format!("{unit}?"), &seq, start);
    prop_assert!(optional.contains(&start));
    prop_assert!(ends(unit, &seq, start).is_subset(&optional));
  }

  #[test]
  fn star_is_optional_plus(unit in prop::sample::select(UNITS), text in "[abcde]{0,6}", start in 0usize..7) {
    let seq = word(&store(), &text);
    prop_assert_eq!(ends(&format!("{unit}*"), &seq, start), ends(&format!("({unit}+)?"), &seq, start));
  }

  #[test]
  fn alternation_commutes(
    x in prop::sample::select(UNITS),
    y in prop::sample::select(UNITS),
    text in "[abcde]{0,6}",
    start in 0usize..7,
  ) {
    let seq = word(&store(), &text);
    prop_assert_eq!(ends(&format!("{{{x} {y}}}"), &seq, start), ends(&format!("{{{y} {x}}}"), &seq, start));
  }

  #[test]
  fn negation_consumes_one(text in "[abc]{0,6}", start in 0usize..7) {
    let seq = word(&store(), &text);
    let negated = !ends("!a", &seq, start).is_empty();
    prop_assert_eq!(negated, start < seq.len() && ends("a", &seq, start).is_empty());
  }

  #[test]
  fn empty_environment_always_matches(text in "[abc]{0,6}", start in 0usize..7) {
    let store = store();
    let seq = word(&store, &text);
    prop_assume!(start <= seq.len());
    let cond = Condition::new("_", &store).unwrap();
    prop_assert!(cond.is_match(&seq, start, start));
    prop_assert!(cond.is_match(&seq, start, seq.len()));
  }

  #[test]
  fn substitution_round_trip(text in "[axy]{0,10}") {
    let store = store();
    let seq = word(&store, &text);
    let there = Rule::parse("a > b", &store).unwrap();
    let back = Rule::parse("b > a", &store).unwrap();
    prop_assert_eq!(back.apply(&there.apply(&seq)), seq);
  }
}
