use std::fmt;

use hashbrown::{HashMap, HashSet};
use intern_all::Tok;
use itertools::Itertools;

use crate::model::{starts_with_at, Segment};

/// A state of a [super::Machine]. Ids are unique across every graph of the
/// machine that issued them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

/// Index of a graph in the arena of a [super::Machine]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(pub(crate) usize);

/// What an arc consumes
#[derive(Clone, Debug)]
pub enum Label {
  /// Nothing
  Epsilon,
  /// This exact run of segments, compared under [Segment::matches]
  Literal(Vec<Segment>),
  /// Any one of the alternatives of a macro, already in reading order
  Macro {
    /// Name of the macro
    name: Tok<String>,
    /// The expanded alternatives
    alternatives: Vec<Vec<Segment>>,
  },
  /// One segment other than the boundary
  Wildcard,
  /// One segment other than the boundary, where the graph doesn't match
  Not(GraphId),
}
impl Label {
  /// Whether the arc can be taken without consuming anything
  #[must_use]
  pub fn is_epsilon(&self) -> bool { matches!(self, Self::Epsilon) }

  /// Positions reachable from `pos` by consuming the label, each with the
  /// index of the macro alternative that got there. [Label::Not] depends on
  /// its machine and never advances here.
  #[must_use]
  pub fn advance(&self, target: &[Segment], pos: usize) -> Vec<(usize, Option<usize>)> {
    match self {
      Self::Epsilon => vec![(pos, None)],
      Self::Literal(segs) if starts_with_at(target, pos, segs) => vec![(pos + segs.len(), None)],
      Self::Macro { alternatives, .. } => (alternatives.iter().enumerate())
        .filter(|(_, alt)| starts_with_at(target, pos, alt))
        .map(|(k, alt)| (pos + alt.len(), Some(k)))
        .collect(),
      Self::Wildcard => match target.get(pos) {
        Some(seg) if !seg.is_boundary() => vec![(pos + 1, None)],
        _ => Vec::new(),
      },
      Self::Literal(_) | Self::Not(_) => Vec::new(),
    }
  }
}
impl fmt::Display for Label {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Epsilon => write!(f, "ε"),
      Self::Literal(segs) => write!(f, "{}", segs.iter().join("")),
      Self::Macro { name, .. } => write!(f, "{}", name.as_str()),
      Self::Wildcard => write!(f, "."),
      Self::Not(g) => write!(f, "!<{}>", g.0),
    }
  }
}

/// One level of a machine. States bound to a nested graph run that graph
/// before any of their own arcs are taken.
#[derive(Clone, Debug, Default)]
pub struct Graph {
  pub(crate) start: StateId,
  pub(crate) accepting: HashSet<StateId>,
  pub(crate) arcs: HashMap<StateId, Vec<(Label, StateId)>>,
  pub(crate) nested: HashMap<StateId, GraphId>,
}
impl Graph {
  /// Where matching begins
  #[must_use]
  pub fn start(&self) -> StateId { self.start }

  /// Outgoing arcs of a state
  #[must_use]
  pub fn arcs(&self, state: StateId) -> &[(Label, StateId)] {
    self.arcs.get(&state).map_or(&[], Vec::as_slice)
  }

  /// The graph a state is bound to
  #[must_use]
  pub fn nested(&self, state: StateId) -> Option<GraphId> { self.nested.get(&state).copied() }

  /// Marked accepting, or a plain state with nowhere to go
  #[must_use]
  pub fn is_accepting(&self, state: StateId) -> bool {
    self.accepting.contains(&state)
      || (self.arcs(state).is_empty() && !self.nested.contains_key(&state))
  }

  /// Every state mentioned by the graph
  pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
    let targets = self.arcs.values().flat_map(|v| v.iter().map(|(_, t)| *t));
    ([self.start].into_iter())
      .chain(self.arcs.keys().copied())
      .chain(targets)
      .chain(self.accepting.iter().copied())
      .unique()
  }
}
