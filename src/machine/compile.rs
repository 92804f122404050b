use std::slice;

use itertools::Itertools;

use super::{Graph, GraphId, Label, Machine, StateId};
use crate::error::CompileResult;
use crate::model::Segment;
use crate::pattern::{
  parse_pattern, pattern_text, ExprKind, Expression, PatternError, Quantifier, Terminal,
};
use crate::utils::Side;
use crate::variables::VariableStore;

/// Either a single arc or a nested graph; the two are wired differently
enum Unit {
  Arc(Label),
  Nested(GraphId),
}

/// Issues states and graphs for one machine
struct Builder<'a> {
  store: &'a VariableStore,
  side: Side,
  graphs: Vec<Graph>,
  next_state: usize,
}
impl Builder<'_> {
  fn state(&mut self) -> StateId {
    self.next_state += 1;
    StateId(self.next_state - 1)
  }

  fn graph(&mut self) -> GraphId {
    let start = self.state();
    self.graphs.push(Graph { start, ..Graph::default() });
    GraphId(self.graphs.len() - 1)
  }

  fn graph_mut(&mut self, id: GraphId) -> &mut Graph { &mut self.graphs[id.0] }

  fn arc(&mut self, g: GraphId, from: StateId, label: Label, to: StateId) {
    self.graph_mut(g).arcs.entry(from).or_default().push((label, to))
  }

  fn eps(&mut self, g: GraphId, from: StateId, to: StateId) { self.arc(g, from, Label::Epsilon, to) }

  /// A graph matching the concatenation of `exprs`
  fn sequence(&mut self, exprs: &[Expression]) -> CompileResult<GraphId> {
    let g = self.graph();
    let start = self.graph_mut(g).start;
    let end = self.wire_all(g, exprs, start)?;
    self.graph_mut(g).accepting.insert(end);
    Ok(g)
  }

  /// A graph whose alternatives share one entry and one exit
  fn alternation(&mut self, alts: &[Expression]) -> CompileResult<GraphId> {
    let g = self.graph();
    let (start, exit) = (self.graph_mut(g).start, self.state());
    for alt in alts {
      let end = self.wire(g, alt, start)?;
      self.eps(g, end, exit);
    }
    self.graph_mut(g).accepting.insert(exit);
    Ok(g)
  }

  fn wire_all(
    &mut self,
    g: GraphId,
    exprs: &[Expression],
    mut cursor: StateId,
  ) -> CompileResult<StateId> {
    let mut pairs = exprs.iter().tuple_windows();
    let touching = |(a, b): &(&Expression, &Expression)| {
      a.edge_is_boundary(Side::Left) && b.edge_is_boundary(Side::Right)
    };
    if let Some((a, b)) = pairs.find(touching) {
      return Err(PatternError::AdjacentBoundaries(format!("{a}{b}")).into());
    }
    for expr in self.side.walk(exprs) {
      cursor = self.wire(g, expr, cursor)?;
    }
    Ok(cursor)
  }

  fn wire(&mut self, g: GraphId, expr: &Expression, prev: StateId) -> CompileResult<StateId> {
    if expr.is_only_boundary() && expr.quantifier != Quantifier::One {
      return Err(PatternError::BoundaryQuantified(expr.to_string()).into());
    }
    let unit = if expr.negative {
      let inner = Expression::new(expr.kind.clone());
      Unit::Arc(Label::Not(self.sequence(slice::from_ref(&inner))?))
    } else {
      match &expr.kind {
        ExprKind::Terminal(t) => Unit::Arc(self.label(t)?),
        ExprKind::Group(children) => Unit::Nested(self.sequence(children)?),
        ExprKind::Alternation(alts) => Unit::Nested(self.alternation(alts)?),
      }
    };
    Ok(match unit {
      Unit::Arc(label) => self.wire_arc(g, label, expr.quantifier, prev),
      Unit::Nested(sub) => self.wire_nested(g, sub, expr.quantifier, prev),
    })
  }

  fn label(&self, terminal: &Terminal) -> CompileResult<Label> {
    Ok(match terminal {
      Terminal::Literal(seg) => Label::Literal(vec![seg.clone()]),
      Terminal::Boundary => Label::Literal(vec![Segment::boundary(self.store.model())]),
      Terminal::Wildcard => Label::Wildcard,
      Terminal::Macro(name) => {
        let alts = self.store.alternatives(name.as_str())?;
        let alternatives = alts.iter().map(|seq| self.side.orient(seq.as_slice())).collect();
        Label::Macro { name: name.clone(), alternatives }
      },
    })
  }

  // Loops hang off a fresh anchor so that back-arcs never reach a state that
  // earlier constructs also leave from
  fn wire_arc(&mut self, g: GraphId, label: Label, q: Quantifier, prev: StateId) -> StateId {
    let next = self.state();
    match q {
      Quantifier::One => self.arc(g, prev, label, next),
      Quantifier::Optional => {
        self.arc(g, prev, label, next);
        self.eps(g, prev, next);
      },
      Quantifier::Star => {
        let anchor = self.state();
        self.eps(g, prev, anchor);
        self.arc(g, anchor, label, anchor);
        self.eps(g, anchor, next);
      },
      Quantifier::Plus => {
        let anchor = self.state();
        self.eps(g, prev, anchor);
        self.arc(g, anchor, label, next);
        self.eps(g, next, anchor);
      },
    }
    next
  }

  fn wire_nested(&mut self, g: GraphId, sub: GraphId, q: Quantifier, prev: StateId) -> StateId {
    let (entry, exit) = (self.state(), self.state());
    self.graph_mut(g).nested.insert(entry, sub);
    match q {
      Quantifier::One => {
        self.eps(g, prev, entry);
        self.eps(g, entry, exit);
      },
      Quantifier::Optional => {
        self.eps(g, prev, entry);
        self.eps(g, entry, exit);
        self.eps(g, prev, exit);
      },
      Quantifier::Star => {
        let anchor = self.state();
        self.eps(g, prev, anchor);
        self.eps(g, anchor, entry);
        self.eps(g, entry, anchor);
        self.eps(g, anchor, exit);
      },
      Quantifier::Plus => {
        let anchor = self.state();
        self.eps(g, prev, anchor);
        self.eps(g, anchor, entry);
        self.eps(g, entry, exit);
        self.eps(g, exit, anchor);
      },
    }
    exit
  }
}

impl Machine {
  /// Compile parsed nodes. Macros are looked up in the store and their
  /// alternatives copied into the machine, so later definitions don't affect
  /// it.
  pub fn compile(exprs: &[Expression], store: &VariableStore, side: Side) -> CompileResult<Self> {
    let mut builder = Builder { store, side, graphs: Vec::new(), next_state: 0 };
    let root = builder.sequence(exprs)?;
    let text = pattern_text(exprs);
    tracing::trace!(pattern = %text, %side, states = builder.next_state, "compiled machine");
    Ok(Self { graphs: builder.graphs, root, side, model: store.model().clone(), text })
  }

  /// Parse and compile pattern text
  pub fn from_pattern(text: &str, store: &VariableStore, side: Side) -> CompileResult<Self> {
    Self::compile(&parse_pattern(text, store)?, store, side)
  }
}

#[cfg(test)]
mod test {
  use super::Machine;
  use crate::error::ErrorKind;
  use crate::model::FeatureModel;
  use crate::utils::Side;
  use crate::variables::VariableStore;

  #[test]
  fn arena_layout() {
    let store = VariableStore::new(&FeatureModel::empty());
    let m = Machine::from_pattern("a(bc)*{d e}", &store, Side::Right).unwrap();
    assert_eq!(m.graph_count(), 3, "root, group and alternation");
    let root = m.graph(m.root()).unwrap();
    let live = |s| !root.arcs(s).is_empty() || root.is_accepting(s) || root.nested(s).is_some();
    assert!(root.states().all(live), "no dead states");
    let empty = Machine::from_pattern("", &store, Side::Left).unwrap();
    assert!(empty.is_trivial());
    let root = empty.graph(empty.root()).unwrap();
    assert!(root.is_accepting(root.start()));
  }

  #[test]
  fn boundary_legality() {
    let store = VariableStore::new(&FeatureModel::empty());
    let bad = ["a#?", "##a", "a(##)", "#*", "#(#)", "{#}#", "(#)?", "({# #})+", "(a#){#b}"];
    for text in bad {
      let err = Machine::from_pattern(text, &store, Side::Right).expect_err(text);
      assert_eq!(err.kind(), ErrorKind::Pattern, "{text}");
    }
    for text in ["#a#", "#(a)#", "{# a}b", "(#a)*", "{#a b}#"] {
      assert!(Machine::from_pattern(text, &store, Side::Left).is_ok(), "{text}");
    }
  }

  #[test]
  fn undefined_macro_is_a_literal() {
    let mut store = VariableStore::new(&FeatureModel::empty());
    let before = Machine::from_pattern("C", &store, Side::Right).unwrap();
    store.add("C = p t").unwrap();
    let after = Machine::from_pattern("C", &store, Side::Right).unwrap();
    assert_eq!(before.text(), after.text());
    assert_eq!(before.graph_count(), 1);
  }
}
