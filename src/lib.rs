#![warn(missing_docs)]
//! A sound change engine for historical linguistics.
//!
//! Rules are written as `source > target / left_right`. Environments use a
//! small regular expression dialect over segments: groups `( )`, alternations
//! `{ }`, the quantifiers `? * +`, negation `!`, the word boundary `#`, the
//! wildcard `.`, feature bundles `[+voice,-son]` and macros defined with
//! `NAME = alt1 alt2`. Each pattern is compiled to a nondeterministic state
//! graph which is simulated without backtracking.
//!
//! ```
//! use soundshift::model::{FeatureModel, Segmenter};
//! use soundshift::rule::Rule;
//! use soundshift::variables::VariableStore;
//!
//! let mut store = VariableStore::new(&FeatureModel::empty());
//! store.add("V = a e i o u").unwrap();
//! let rule = Rule::parse("t > d / V_V", &store).unwrap();
//! let word = Segmenter::new(store.model()).segment("atata");
//! assert_eq!(rule.apply(&word).to_string(), "adada");
//! ```
pub mod condition;
pub mod error;
pub mod machine;
pub mod model;
pub mod pattern;
pub mod rule;
pub mod ruleset;
pub mod utils;
pub mod variables;

pub use condition::{Condition, Environment};
pub use error::{CompileError, CompileResult, ErrorKind};
pub use machine::Machine;
pub use model::{FeatureModel, Segment, Segmenter, Sequence};
pub use rule::Rule;
pub use ruleset::{Ruleset, RulesetError};
pub use variables::VariableStore;
