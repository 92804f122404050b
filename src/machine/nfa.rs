use std::fmt;
use std::sync::Arc;

use super::{Graph, GraphId};
use crate::model::FeatureModel;
use crate::utils::Side;

/// A compiled pattern: an arena of graphs, the root of which describes the
/// whole pattern. Read-only once built and safe to share between threads.
#[derive(Clone, Debug)]
pub struct Machine {
  pub(super) graphs: Vec<Graph>,
  pub(super) root: GraphId,
  pub(super) side: Side,
  pub(super) model: Arc<FeatureModel>,
  pub(super) text: String,
}
impl Machine {
  /// The direction the pattern was compiled for
  #[must_use]
  pub fn side(&self) -> Side { self.side }

  /// The outermost graph
  #[must_use]
  pub fn root(&self) -> GraphId { self.root }

  /// A graph of the arena
  #[must_use]
  pub fn graph(&self, id: GraphId) -> Option<&Graph> { self.graphs.get(id.0) }

  /// Number of graphs, the root included
  #[must_use]
  pub fn graph_count(&self) -> usize { self.graphs.len() }

  /// The model literals were resolved against
  #[must_use]
  pub fn model(&self) -> &Arc<FeatureModel> { &self.model }

  /// Whether the pattern was empty, so that the machine accepts anywhere
  #[must_use]
  pub fn is_trivial(&self) -> bool { self.text.is_empty() }

  /// The pattern text the machine was compiled from
  #[must_use]
  pub fn text(&self) -> &str { &self.text }
}
impl fmt::Display for Machine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}({})", self.side, self.text)
  }
}
