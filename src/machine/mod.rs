//! Patterns compiled into nondeterministic state graphs, and their
//! simulation
mod compile;
mod graph;
mod nfa;
mod simulate;

pub use graph::{Graph, GraphId, Label, StateId};
pub use nfa::Machine;
